//! Health profile and allergy management

use std::sync::Arc;

use log::warn;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::fetch::Fetch;
use crate::session::SessionStore;

/// The health/dietary profile form payload
#[derive(Debug, Clone, Serialize)]
pub struct ProfilePayload {
    pub name: String,
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub allergies: Vec<String>,
}

/// Acknowledgement returned when a profile is saved
#[derive(Debug, Clone, Deserialize)]
pub struct SavedProfile {
    #[serde(default)]
    pub message: Option<String>,
    pub user_id: i64,
}

/// One entry of the allergy catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllergyEntry {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct AllergyIdsBody {
    allergy_ids: Vec<i64>,
}

/// Result of translating free-text allergy names to catalog ids.
///
/// Unmatched names are carried here so the UI can tell the user they were
/// ignored; they are never dropped silently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllergyResolution {
    pub ids: Vec<i64>,
    pub unmatched: Vec<String>,
}

/// Translate free-text allergy names against the catalog.
///
/// Matching is case-insensitive; a name that misses is retried with a
/// trailing `s` stripped (only for names longer than three characters, the
/// same heuristic the backend's auto-mapper uses).
pub fn resolve_allergy_names(names: &[String], catalog: &[AllergyEntry]) -> AllergyResolution {
    let mut resolution = AllergyResolution::default();

    for name in names {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            continue;
        }

        let mut found = lookup(&needle, catalog);
        if found.is_none() && needle.ends_with('s') && needle.len() > 3 {
            found = lookup(&needle[..needle.len() - 1], catalog);
        }

        match found {
            Some(id) => {
                if !resolution.ids.contains(&id) {
                    resolution.ids.push(id);
                }
            }
            None => {
                warn!("no catalog entry for allergy \"{}\"", name.trim());
                resolution.unmatched.push(name.trim().to_string());
            }
        }
    }

    resolution
}

fn lookup(needle: &str, catalog: &[AllergyEntry]) -> Option<i64> {
    catalog
        .iter()
        .find(|entry| entry.name.to_lowercase() == needle)
        .map(|entry| entry.id)
}

/// Client for the profile and allergy-catalog collaborators
pub struct ProfileClient {
    url: String,
    client: Client,
    session: Arc<SessionStore>,
}

impl ProfileClient {
    pub(crate) fn new(url: &str, client: Client, session: Arc<SessionStore>) -> Self {
        Self {
            url: url.to_string(),
            client,
            session,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }

    /// Save the user's health profile
    pub async fn save_profile(&self, payload: &ProfilePayload) -> Result<SavedProfile, Error> {
        if payload.name.trim().is_empty() {
            return Err(Error::validation("name is required"));
        }

        Fetch::post(&self.client, &self.endpoint("/profile"))
            .session(&self.session)
            .json(payload)?
            .execute::<SavedProfile>()
            .await
    }

    /// The user's currently stored allergy ids
    pub async fn my_allergy_ids(&self) -> Result<Vec<i64>, Error> {
        let body = Fetch::get(&self.client, &self.endpoint("/profile/allergies"))
            .session(&self.session)
            .execute::<AllergyIdsBody>()
            .await?;
        Ok(body.allergy_ids)
    }

    /// Replace the user's stored allergy ids
    pub async fn set_my_allergy_ids(&self, allergy_ids: &[i64]) -> Result<(), Error> {
        let body = AllergyIdsBody {
            allergy_ids: allergy_ids.to_vec(),
        };

        Fetch::post(&self.client, &self.endpoint("/profile/allergies"))
            .session(&self.session)
            .json(&body)?
            .execute_raw()
            .await?;
        Ok(())
    }

    /// The full allergy catalog, ordered by name
    pub async fn list_allergies(&self) -> Result<Vec<AllergyEntry>, Error> {
        Fetch::get(&self.client, &self.endpoint("/allergies/"))
            .session(&self.session)
            .execute::<Vec<AllergyEntry>>()
            .await
    }
}
