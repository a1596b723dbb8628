//! Authentication and user management

mod types;

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use reqwest::Client;

use crate::error::Error;
use crate::fetch::Fetch;
use crate::session::SessionStore;

pub use types::*;

/// Client for the auth collaborator
pub struct AuthClient {
    /// The API base URL
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// The shared session store updated on login and logout
    session: Arc<SessionStore>,
}

impl AuthClient {
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

    /// Register a new account.
    ///
    /// Missing fields are rejected locally before any network call; backend
    /// failures carry the backend's own detail message.
    pub async fn sign_up(&self, email: &str, password: &str, full_name: &str) -> Result<(), Error> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(Error::validation("email and password are required"));
        }

        let mut body = HashMap::new();
        body.insert("email".to_string(), email.to_string());
        body.insert("password".to_string(), password.to_string());
        body.insert("full_name".to_string(), full_name.to_string());

        Fetch::post(&self.client, &self.endpoint("/auth/signup"))
            .json(&body)?
            .execute_raw()
            .await?;

        debug!("signed up {}", email);
        Ok(())
    }

    /// Sign in with email and password.
    ///
    /// On success the token is persisted and the user's profile is fetched
    /// and cached alongside it, so the session ends up either fully
    /// populated or (if the profile fetch fails) token-only.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, Error> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(Error::validation("email and password are required"));
        }

        let mut body = HashMap::new();
        body.insert("email".to_string(), email.to_string());
        body.insert("password".to_string(), password.to_string());

        let response = Fetch::post(&self.client, &self.endpoint("/auth/login"))
            .json(&body)?
            .execute::<AuthResponse>()
            .await?;

        self.session.set_token(&response.access_token)?;

        let user = self.current_user_profile().await?;
        self.session.set_current_user(&user)?;

        debug!("signed in {}", user.email);
        Ok(response)
    }

    /// Fetch the authenticated user's profile from the backend
    pub async fn current_user_profile(&self) -> Result<UserProfile, Error> {
        if !self.session.is_authenticated() {
            return Err(Error::auth("Not logged in"));
        }

        Fetch::get(&self.client, &self.endpoint("/users/me"))
            .session(&self.session)
            .execute::<UserProfile>()
            .await
    }

    /// Sign out: clears the local session. Purely local; the token simply
    /// stops being sent.
    pub fn sign_out(&self) -> Result<(), Error> {
        self.session.logout()
    }
}
