//! Normalization of raw search results into the canonical meal shape
//!
//! The search backend has drifted between snake_case, camelCase and renamed
//! fields across revisions, so each output field is resolved through a
//! fixed, ordered alias list: first defined value wins, and a field with no
//! defined alias stays absent. [`map_meal`] is pure and total over any JSON
//! input; it never fails and never substitutes sentinel values for missing
//! data.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::plan::{EntryId, PlanEntry};

const ID_ALIASES: &[&str] = &["id", "recipe_id", "meal_id"];
const TITLE_ALIASES: &[&str] = &["title", "name", "recipe_name", "meal_name"];
const IMAGE_ALIASES: &[&str] = &["image", "image_url", "imageUrl", "img", "thumbnail"];
const CALORIES_ALIASES: &[&str] = &["calories", "kcal", "calories_per_serving"];
const PROTEIN_ALIASES: &[&str] = &["protein", "protein_g", "proteinG"];
const CARBS_ALIASES: &[&str] = &["carbs", "carbs_g", "carbohydrates"];
const FAT_ALIASES: &[&str] = &["fat", "fat_g", "fatG"];
const TIME_ALIASES: &[&str] = &["time", "prep_time", "prepTime", "ready_in_minutes"];
const TAGS_ALIASES: &[&str] = &["tags", "labels"];
const INSTRUCTIONS_ALIASES: &[&str] = &["instructions", "steps", "directions"];

/// The canonical meal view record.
///
/// Every field is optional: absence means no recognized alias carried a
/// defined value. Nutrition fields stay numeric, so 0 is distinguishable
/// from missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Meal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl Meal {
    /// Convert into a plan entry, carrying the normalized fields as the
    /// opaque payload. Returns `None` when the record had no id, since plan
    /// entries are keyed by backend-issued ids only.
    pub fn plan_entry(&self) -> Option<PlanEntry> {
        let id = self.id.clone()?;
        let mut payload = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        payload.remove("id");
        Some(PlanEntry { id, payload })
    }
}

/// Map an arbitrary search-result record to the canonical meal shape
pub fn map_meal(raw: &Value) -> Meal {
    Meal {
        id: entry_id(raw),
        title: first_string(raw, TITLE_ALIASES),
        image: first_string(raw, IMAGE_ALIASES),
        calories: first_number(raw, CALORIES_ALIASES),
        protein: first_number(raw, PROTEIN_ALIASES),
        carbs: first_number(raw, CARBS_ALIASES),
        fat: first_number(raw, FAT_ALIASES),
        time: first_text(raw, TIME_ALIASES),
        tags: string_list(raw, TAGS_ALIASES),
        instructions: joined_text(raw, INSTRUCTIONS_ALIASES),
    }
}

/// The first alias whose value is present and non-null
fn first_defined<'a>(raw: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    let obj = raw.as_object()?;
    aliases
        .iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

fn entry_id(raw: &Value) -> Option<EntryId> {
    match first_defined(raw, ID_ALIASES)? {
        Value::Number(n) => n.as_i64().map(EntryId::Int),
        Value::String(s) => Some(EntryId::Text(s.clone())),
        _ => None,
    }
}

fn first_string(raw: &Value, aliases: &[&str]) -> Option<String> {
    first_defined(raw, aliases)?.as_str().map(str::to_string)
}

fn first_number(raw: &Value, aliases: &[&str]) -> Option<f64> {
    first_defined(raw, aliases)?.as_f64()
}

/// Like [`first_string`], but tolerates numeric values (a prep time has
/// arrived both as "20 min" and as plain minutes)
fn first_text(raw: &Value, aliases: &[&str]) -> Option<String> {
    match first_defined(raw, aliases)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_list(raw: &Value, aliases: &[&str]) -> Option<Vec<String>> {
    let items = first_defined(raw, aliases)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
    )
}

/// A string as-is; an array of strings joined line by line
fn joined_text(raw: &Value, aliases: &[&str]) -> Option<String> {
    match first_defined(raw, aliases)? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| item.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_snake_case_record() {
        let meal = map_meal(&json!({
            "id": 7,
            "name": "Tofu Bowl",
            "image_url": "https://img.example/tofu.jpg",
            "calories": 420.0,
            "protein_g": 22.5,
            "prep_time": "20 min",
            "tags": ["vegan", "high-protein"],
        }));

        assert_eq!(meal.id, Some(EntryId::Int(7)));
        assert_eq!(meal.title.as_deref(), Some("Tofu Bowl"));
        assert_eq!(meal.image.as_deref(), Some("https://img.example/tofu.jpg"));
        assert_eq!(meal.calories, Some(420.0));
        assert_eq!(meal.protein, Some(22.5));
        assert_eq!(meal.time.as_deref(), Some("20 min"));
        assert_eq!(
            meal.tags,
            Some(vec!["vegan".to_string(), "high-protein".to_string()])
        );
    }

    #[test]
    fn maps_camel_case_aliases() {
        let meal = map_meal(&json!({
            "meal_id": "abc-123",
            "title": "Oats",
            "imageUrl": "https://img.example/oats.jpg",
            "proteinG": 11,
        }));

        assert_eq!(meal.id, Some(EntryId::Text("abc-123".to_string())));
        assert_eq!(meal.image.as_deref(), Some("https://img.example/oats.jpg"));
        assert_eq!(meal.protein, Some(11.0));
    }

    #[test]
    fn earlier_alias_wins() {
        let meal = map_meal(&json!({
            "id": 1,
            "title": "canonical",
            "name": "fallback",
        }));

        assert_eq!(meal.title.as_deref(), Some("canonical"));
    }

    #[test]
    fn null_alias_falls_through_to_the_next() {
        let meal = map_meal(&json!({
            "id": 1,
            "title": null,
            "name": "fallback",
        }));

        assert_eq!(meal.title.as_deref(), Some("fallback"));
    }

    #[test]
    fn unrecognized_fields_stay_absent() {
        let meal = map_meal(&json!({"unrelated": "value"}));

        assert_eq!(meal, Meal::default());
    }

    #[test]
    fn non_object_input_maps_to_the_empty_meal() {
        for raw in [json!(null), json!(42), json!("text"), json!([1, 2, 3])] {
            assert_eq!(map_meal(&raw), Meal::default());
        }
    }

    #[test]
    fn zero_calories_is_a_value_not_absence() {
        let meal = map_meal(&json!({"id": 1, "calories": 0}));
        assert_eq!(meal.calories, Some(0.0));
    }

    #[test]
    fn numeric_prep_time_is_carried_as_text() {
        let meal = map_meal(&json!({"id": 1, "ready_in_minutes": 25}));
        assert_eq!(meal.time.as_deref(), Some("25"));
    }

    #[test]
    fn steps_array_joins_into_instructions() {
        let meal = map_meal(&json!({
            "id": 1,
            "steps": ["Chop", "Fry", "Serve"],
        }));

        assert_eq!(meal.instructions.as_deref(), Some("Chop\nFry\nServe"));
    }

    #[test]
    fn plan_entry_requires_an_id() {
        assert!(map_meal(&json!({"title": "No id"})).plan_entry().is_none());

        let entry = map_meal(&json!({"id": 7, "title": "Tofu Bowl"}))
            .plan_entry()
            .unwrap();
        assert_eq!(entry.id, EntryId::Int(7));
        assert_eq!(entry.payload["title"], json!("Tofu Bowl"));
        assert!(!entry.payload.contains_key("id"));
    }
}
