//! The per-user meal plan: a duplicate-free, ordered, durable collection
//!
//! Each user's plan is stored under a key scoped to that user's identity
//! (their email), so plans never leak across accounts. The store is the
//! sole source of truth for "what is currently in my plan".

use std::fmt;
use std::sync::Arc;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::store::KeyValueStore;

/// A plan entry's identifier, as issued by the search backend.
///
/// Backends have served both integer and string ids across revisions; ids
/// are never generated locally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Int(i64),
    Text(String),
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Int(n) => write!(f, "{}", n),
            EntryId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for EntryId {
    fn from(value: i64) -> Self {
        EntryId::Int(value)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        EntryId::Text(value.to_string())
    }
}

/// One selected meal in a plan.
///
/// Only `id` is interpreted; the descriptive fields (title, calories, image,
/// macros, ...) ride along unchanged in `payload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub id: EntryId,

    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl PlanEntry {
    /// Create an entry with an empty payload
    pub fn new(id: impl Into<EntryId>) -> Self {
        Self {
            id: id.into(),
            payload: Map::new(),
        }
    }
}

fn plan_key(user_key: &str) -> String {
    format!("mealplan_{}", user_key)
}

/// Durable store for per-user meal plans.
///
/// Writes are read-modify-write over the backing key-value store with no
/// version check: two concurrent writers (two tabs sharing a storage scope)
/// are last-writer-wins. Within one process the store is only driven from
/// the sequential UI task queue, so operations never interleave.
pub struct PlanStore {
    store: Arc<dyn KeyValueStore>,
}

impl PlanStore {
    /// Create a plan store over the given storage backend
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the persisted plan for `user_key`.
    ///
    /// A missing or malformed stored plan reads as empty; this never fails.
    pub fn load(&self, user_key: &str) -> Vec<PlanEntry> {
        let Some(raw) = self.store.get(&plan_key(user_key)) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("discarding malformed plan for {}: {}", user_key, err);
                Vec::new()
            }
        }
    }

    /// Merge `candidates` into the persisted plan and return the result.
    ///
    /// Entries already in the plan keep their positions; candidates whose id
    /// is not yet present are appended in candidate order. Repeating the
    /// merge with the same candidates changes nothing.
    pub fn merge(&self, user_key: &str, candidates: &[PlanEntry]) -> Result<Vec<PlanEntry>, Error> {
        let mut plan = self.load(user_key);
        for candidate in candidates {
            if !plan.iter().any(|entry| entry.id == candidate.id) {
                plan.push(candidate.clone());
            }
        }
        self.persist(user_key, &plan)?;
        debug!("plan for {} now holds {} entries", user_key, plan.len());
        Ok(plan)
    }

    /// Remove every entry with the given id and return the remainder.
    ///
    /// Removing an id that is not in the plan is a no-op, not an error.
    pub fn remove(&self, user_key: &str, id: &EntryId) -> Result<Vec<PlanEntry>, Error> {
        let mut plan = self.load(user_key);
        plan.retain(|entry| entry.id != *id);
        self.persist(user_key, &plan)?;
        Ok(plan)
    }

    /// Delete the entire persisted plan for `user_key`.
    ///
    /// Irreversible; confirming with the user first is the caller's job.
    pub fn clear(&self, user_key: &str) -> Result<(), Error> {
        self.store.remove(&plan_key(user_key))
    }

    fn persist(&self, user_key: &str, plan: &[PlanEntry]) -> Result<(), Error> {
        let json = serde_json::to_string(plan)?;
        self.store.set(&plan_key(user_key), &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn plan_store() -> PlanStore {
        PlanStore::new(Arc::new(MemoryStore::new()))
    }

    fn entry(id: i64, title: &str) -> PlanEntry {
        let mut payload = Map::new();
        payload.insert("title".to_string(), json!(title));
        PlanEntry {
            id: EntryId::Int(id),
            payload,
        }
    }

    fn ids(plan: &[PlanEntry]) -> Vec<EntryId> {
        plan.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn merge_appends_new_entries_in_candidate_order() {
        let store = plan_store();
        store
            .merge("a@example.com", &[entry(1, "Oats"), entry(2, "Dal")])
            .unwrap();

        let merged = store
            .merge("a@example.com", &[entry(2, "Dal"), entry(3, "Tofu Bowl")])
            .unwrap();

        assert_eq!(
            ids(&merged),
            vec![EntryId::Int(1), EntryId::Int(2), EntryId::Int(3)]
        );
    }

    #[test]
    fn merge_is_idempotent() {
        let store = plan_store();
        let candidates = [entry(1, "Oats"), entry(2, "Dal")];

        let once = store.merge("a@example.com", &candidates).unwrap();
        let twice = store.merge("a@example.com", &candidates).unwrap();

        assert_eq!(once, twice);
        assert_eq!(store.load("a@example.com"), twice);
    }

    #[test]
    fn merge_keeps_the_first_seen_duplicate_within_candidates() {
        let store = plan_store();
        let merged = store
            .merge("a@example.com", &[entry(1, "first"), entry(1, "second")])
            .unwrap();

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].payload["title"], json!("first"));
    }

    #[test]
    fn merge_does_not_replace_existing_payloads() {
        let store = plan_store();
        store.merge("a@example.com", &[entry(1, "original")]).unwrap();

        let merged = store.merge("a@example.com", &[entry(1, "updated")]).unwrap();
        assert_eq!(merged[0].payload["title"], json!("original"));
    }

    #[test]
    fn remove_filters_matching_ids() {
        let store = plan_store();
        store
            .merge("a@example.com", &[entry(1, "Oats"), entry(2, "Dal")])
            .unwrap();

        let remaining = store.remove("a@example.com", &EntryId::Int(2)).unwrap();
        assert_eq!(ids(&remaining), vec![EntryId::Int(1)]);
        assert_eq!(store.load("a@example.com"), remaining);
    }

    #[test]
    fn remove_of_absent_id_is_a_no_op() {
        let store = plan_store();
        let before = store
            .merge("a@example.com", &[entry(1, "Oats"), entry(2, "Dal")])
            .unwrap();

        let after = store.remove("a@example.com", &EntryId::Int(99)).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn clear_deletes_the_whole_plan() {
        let store = plan_store();
        store.merge("a@example.com", &[entry(1, "Oats")]).unwrap();

        store.clear("a@example.com").unwrap();
        assert!(store.load("a@example.com").is_empty());
    }

    #[test]
    fn malformed_stored_plan_loads_as_empty() {
        let backing = Arc::new(MemoryStore::new());
        backing.set("mealplan_a@example.com", "[{\"id\":").unwrap();

        let store = PlanStore::new(backing);
        assert!(store.load("a@example.com").is_empty());
    }

    #[test]
    fn plans_are_scoped_per_user() {
        let store = plan_store();
        store.merge("a@example.com", &[entry(1, "Oats")]).unwrap();

        assert!(store.load("b@example.com").is_empty());
    }

    #[test]
    fn string_and_integer_ids_do_not_collide() {
        let store = plan_store();
        let merged = store
            .merge(
                "a@example.com",
                &[PlanEntry::new(7i64), PlanEntry::new("7")],
            )
            .unwrap();

        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn stored_plan_round_trips_flattened_payload() {
        let store = plan_store();
        store.merge("a@example.com", &[entry(7, "Tofu Bowl")]).unwrap();

        let loaded = store.load("a@example.com");
        assert_eq!(loaded[0].id, EntryId::Int(7));
        assert_eq!(loaded[0].payload["title"], json!("Tofu Bowl"));
    }
}
