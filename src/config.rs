//! Configuration options for the SmartMeal client

use std::time::Duration;

/// Default API base URL used by the development setup
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Configuration options for the SmartMeal client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout applied to every outgoing HTTP request
    pub request_timeout: Option<Duration>,

    /// Prefix applied to every session storage key, so several clients can
    /// share one key-value store without clobbering each other
    pub storage_prefix: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            storage_prefix: String::new(),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the session storage key prefix
    pub fn with_storage_prefix(mut self, value: &str) -> Self {
        self.storage_prefix = value.to_string();
        self
    }
}
