//! Error handling for the SmartMeal client

use std::fmt;
use thiserror::Error;

/// Unified error type for the SmartMeal client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Authentication errors raised locally (no session, invariant violations)
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The backend rejected the current credentials; the local session has
    /// already been cleared and the caller should redirect to login
    #[error("Session rejected by the backend")]
    Unauthorized,

    /// Input rejected before any network or storage call was attempted
    #[error("Validation error: {0}")]
    Validation(String),

    /// A collaborator call failed; `detail` carries the backend's own
    /// message verbatim when one was provided
    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    /// Durable storage write failures
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new API error from a status code and detail message
    pub fn api<T: fmt::Display>(status: u16, detail: T) -> Self {
        Error::Api {
            status,
            detail: detail.to_string(),
        }
    }

    /// Create a new storage error
    pub fn storage<T: fmt::Display>(msg: T) -> Self {
        Error::Storage(msg.to_string())
    }

    /// Whether this error means the session is gone and the user must log
    /// in again
    pub fn requires_login(&self) -> bool {
        matches!(self, Error::Unauthorized)
    }
}
