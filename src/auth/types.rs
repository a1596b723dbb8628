//! Wire types for authentication and user management

use serde::{Deserialize, Serialize};

/// Response from a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The bearer token for subsequent requests
    #[serde(rename = "access_token")]
    pub access_token: String,

    /// The token type, normally "bearer"
    #[serde(rename = "token_type", default)]
    pub token_type: Option<String>,
}

/// The authenticated user's profile-relevant fields, as returned by the
/// backend and cached locally for the lifetime of the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The backend's user id
    #[serde(default)]
    pub id: Option<i64>,

    /// The user's email address; also the key that scopes the user's plan
    pub email: String,

    /// The user's display name
    #[serde(rename = "full_name", default)]
    pub full_name: Option<String>,
}

impl UserProfile {
    /// The identity key under which this user's plan is stored
    pub fn plan_key(&self) -> &str {
        &self.email
    }
}
