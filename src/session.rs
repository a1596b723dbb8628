//! Session state: the auth token and the cached current user
//!
//! Single authority for "am I logged in, and as whom". The token and the
//! cached user live in durable storage so a session survives restarts; they
//! are set together on login and cleared together on logout. A token stays
//! valid locally until it is cleared or the backend rejects it.

use std::sync::Arc;

use log::{debug, warn};

use crate::auth::UserProfile;
use crate::error::Error;
use crate::store::KeyValueStore;

const TOKEN_KEY: &str = "token";
const CURRENT_USER_KEY: &str = "current_user";

/// Store for the current authentication state.
///
/// Explicitly constructed and injectable: one instance is built at client
/// construction and shared (via `Arc`) by everything that needs to consult
/// or clear the session.
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
    prefix: String,
}

impl SessionStore {
    /// Create a session store over the given storage backend
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_prefix(store, "")
    }

    /// Create a session store whose keys carry a namespace prefix
    pub fn with_prefix(store: Arc<dyn KeyValueStore>, prefix: &str) -> Self {
        Self {
            store,
            prefix: prefix.to_string(),
        }
    }

    fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Persist the auth token. The token is opaque; no format validation
    /// happens locally.
    pub fn set_token(&self, token: &str) -> Result<(), Error> {
        debug!("storing auth token");
        self.store.set(&self.key(TOKEN_KEY), token)
    }

    /// The current auth token, if any. Presence implies "authenticated".
    pub fn token(&self) -> Option<String> {
        self.store.get(&self.key(TOKEN_KEY))
    }

    /// Whether a token is currently present
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Store the token and the user record together. This is the login
    /// path, and the only way to establish a fully populated session.
    pub fn set_session(&self, token: &str, user: &UserProfile) -> Result<(), Error> {
        self.set_token(token)?;
        self.set_current_user(user)
    }

    /// Cache the current user's profile record.
    ///
    /// The cached user's lifetime is tied to the token: caching a user while
    /// no token is present is rejected, so `current_user()` can never return
    /// a user for an anonymous session.
    pub fn set_current_user(&self, user: &UserProfile) -> Result<(), Error> {
        if self.token().is_none() {
            return Err(Error::auth("cannot cache a user without an active token"));
        }
        let json = serde_json::to_string(user)?;
        self.store.set(&self.key(CURRENT_USER_KEY), &json)
    }

    /// The cached current user, if any. Malformed stored data reads as
    /// absent rather than failing.
    pub fn current_user(&self) -> Option<UserProfile> {
        let raw = self.store.get(&self.key(CURRENT_USER_KEY))?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!("discarding malformed cached user: {}", err);
                None
            }
        }
    }

    /// Clear the token and the cached user. After this returns, both
    /// `token()` and `current_user()` read as absent.
    ///
    /// The cached user goes first: if the second remove fails, the session
    /// is left token-only, never user-without-token.
    pub fn logout(&self) -> Result<(), Error> {
        debug!("clearing session");
        self.store.remove(&self.key(CURRENT_USER_KEY))?;
        self.store.remove(&self.key(TOKEN_KEY))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn user(email: &str) -> UserProfile {
        UserProfile {
            id: Some(1),
            email: email.to_string(),
            full_name: Some("Test User".to_string()),
        }
    }

    fn session() -> SessionStore {
        SessionStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn token_round_trip() {
        let session = session();
        assert_eq!(session.token(), None);
        assert!(!session.is_authenticated());

        session.set_token("t1").unwrap();
        assert_eq!(session.token(), Some("t1".to_string()));
        assert!(session.is_authenticated());
    }

    #[test]
    fn logout_clears_token_and_user_together() {
        let session = session();
        session.set_session("t1", &user("a@example.com")).unwrap();
        assert!(session.token().is_some());
        assert!(session.current_user().is_some());

        session.logout().unwrap();
        assert_eq!(session.token(), None);
        assert_eq!(session.current_user(), None);
    }

    #[test]
    fn user_cannot_be_cached_without_token() {
        let session = session();
        let err = session.set_current_user(&user("a@example.com")).unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
        assert_eq!(session.current_user(), None);
    }

    /// Store whose removes fail for one specific key
    struct FlakyStore {
        inner: MemoryStore,
        failing_key: String,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), Error> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), Error> {
            if key == self.failing_key {
                return Err(Error::storage("disk full"));
            }
            self.inner.remove(key)
        }
    }

    #[test]
    fn interrupted_logout_never_leaves_a_user_without_token() {
        let store = Arc::new(FlakyStore {
            inner: MemoryStore::new(),
            failing_key: "token".to_string(),
        });

        let session = SessionStore::new(store);
        session.set_session("t1", &user("a@example.com")).unwrap();

        // The token remove fails, but the cached user is already gone, so
        // the session degrades to token-only rather than user-only.
        assert!(session.logout().is_err());
        assert_eq!(session.current_user(), None);
    }

    #[test]
    fn malformed_cached_user_reads_as_absent() {
        let store = Arc::new(MemoryStore::new());
        store.set("token", "t1").unwrap();
        store.set("current_user", "{truncated").unwrap();

        let session = SessionStore::new(store);
        assert_eq!(session.current_user(), None);
    }

    #[test]
    fn prefix_namespaces_keys() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let a = SessionStore::with_prefix(store.clone(), "a:");
        let b = SessionStore::with_prefix(store, "b:");

        a.set_token("t-a").unwrap();
        assert_eq!(a.token(), Some("t-a".to_string()));
        assert_eq!(b.token(), None);
    }
}
