//! SmartMeal Rust Client Library
//!
//! Client core for the SmartMeal meal-planning app: session state, route
//! guarding, the per-user meal plan, search-result normalization, and thin
//! clients for the auth / search / profile collaborators.

pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod guard;
pub mod mapper;
pub mod plan;
pub mod profile;
pub mod search;
pub mod session;
pub mod store;

use std::sync::Arc;

use reqwest::Client;

use crate::auth::AuthClient;
use crate::config::ClientOptions;
use crate::guard::RouteGuard;
use crate::plan::PlanStore;
use crate::profile::ProfileClient;
use crate::search::SearchClient;
use crate::session::SessionStore;
use crate::store::KeyValueStore;

/// The main entry point for the SmartMeal client
pub struct SmartMeal {
    /// The API base URL
    pub url: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
    session: Arc<SessionStore>,
    plan: PlanStore,
}

impl SmartMeal {
    /// Create a new SmartMeal client over the given storage backend
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use smartmeal_client::store::MemoryStore;
    /// use smartmeal_client::SmartMeal;
    ///
    /// let app = SmartMeal::new("http://localhost:8000/api/v1", Arc::new(MemoryStore::new()));
    /// ```
    pub fn new(base_url: &str, store: Arc<dyn KeyValueStore>) -> Self {
        Self::new_with_options(base_url, store, ClientOptions::default())
    }

    /// Create a new SmartMeal client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use smartmeal_client::config::ClientOptions;
    /// use smartmeal_client::store::MemoryStore;
    /// use smartmeal_client::SmartMeal;
    ///
    /// let options = ClientOptions::default().with_storage_prefix("smartmeal:");
    /// let app = SmartMeal::new_with_options(
    ///     "http://localhost:8000/api/v1",
    ///     Arc::new(MemoryStore::new()),
    ///     options,
    /// );
    /// ```
    pub fn new_with_options(
        base_url: &str,
        store: Arc<dyn KeyValueStore>,
        options: ClientOptions,
    ) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().unwrap_or_default();

        let session = Arc::new(SessionStore::with_prefix(
            store.clone(),
            &options.storage_prefix,
        ));
        let plan = PlanStore::new(store);

        Self {
            url: base_url.trim_end_matches('/').to_string(),
            http_client,
            options,
            session,
            plan,
        }
    }

    /// The shared session store
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// A route guard consulting this client's session
    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(self.session.clone())
    }

    /// The auth client for signup, login and the current-user profile
    pub fn auth(&self) -> AuthClient {
        AuthClient::new(&self.url, self.http_client.clone(), self.session.clone())
    }

    /// The search client for natural-language meal search
    pub fn search(&self) -> SearchClient {
        SearchClient::new(&self.url, self.http_client.clone(), self.session.clone())
    }

    /// The profile client for the health profile and allergy catalog
    pub fn profile(&self) -> ProfileClient {
        ProfileClient::new(&self.url, self.http_client.clone(), self.session.clone())
    }

    /// The per-user meal plan store
    pub fn plan(&self) -> &PlanStore {
        &self.plan
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::guard::{Route, RouteDecision};
    pub use crate::mapper::Meal;
    pub use crate::plan::{EntryId, PlanEntry};
    pub use crate::store::{FileStore, KeyValueStore, MemoryStore};
    pub use crate::SmartMeal;
}
