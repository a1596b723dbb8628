//! Natural-language meal search

use std::sync::Arc;

use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::fetch::Fetch;
use crate::mapper::{map_meal, Meal};
use crate::session::SessionStore;

/// The largest result count the backend accepts
pub const MAX_RESULTS: u32 = 50;

/// Default result count when the caller has no preference
pub const DEFAULT_RESULTS: u32 = 10;

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct SearchResponseBody {
    #[serde(default)]
    applied: Value,

    #[serde(default)]
    results: Vec<Value>,
}

/// A normalized search outcome: the mapped meals plus any warnings the
/// backend attached (e.g. an unsupported filter it ignored). Warnings are
/// surfaced verbatim so the UI can show them to the user.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub meals: Vec<Meal>,
    pub warnings: Vec<String>,
}

/// Client for the search collaborator
pub struct SearchClient {
    url: String,
    client: Client,
    session: Arc<SessionStore>,
}

impl SearchClient {
    pub(crate) fn new(url: &str, client: Client, session: Arc<SessionStore>) -> Self {
        Self {
            url: url.to_string(),
            client,
            session,
        }
    }

    /// Search meals by a natural-language query.
    ///
    /// `limit` is clamped to the backend's accepted range. Overlapping
    /// searches are not fenced: when two calls race, whichever resolves
    /// last wins at the caller.
    pub async fn search_nl(&self, query: &str, limit: u32) -> Result<SearchOutcome, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::validation("search query must not be empty"));
        }
        let limit = limit.clamp(1, MAX_RESULTS);

        let body = SearchRequest { query, limit };
        let response = Fetch::post(&self.client, &format!("{}/search/nl", self.url))
            .session(&self.session)
            .json(&body)?
            .execute::<SearchResponseBody>()
            .await?;

        let meals = response.results.iter().map(map_meal).collect::<Vec<_>>();
        let warnings = applied_warnings(&response.applied);
        for warning in &warnings {
            warn!("search warning: {}", warning);
        }
        debug!("search \"{}\" returned {} meals", query, meals.len());

        Ok(SearchOutcome { meals, warnings })
    }
}

/// Warnings live under `applied.warnings` as an array of strings; anything
/// else in `applied` is backend bookkeeping the client ignores
fn applied_warnings(applied: &Value) -> Vec<String> {
    applied
        .get("warnings")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn warnings_are_read_from_applied() {
        let applied = json!({"warnings": ["ignored unsupported filter", "capped limit"]});
        assert_eq!(
            applied_warnings(&applied),
            vec![
                "ignored unsupported filter".to_string(),
                "capped limit".to_string()
            ]
        );
    }

    #[test]
    fn missing_or_odd_warnings_read_as_none() {
        assert!(applied_warnings(&json!({})).is_empty());
        assert!(applied_warnings(&json!(null)).is_empty());
        assert!(applied_warnings(&json!({"warnings": "not a list"})).is_empty());
    }
}
