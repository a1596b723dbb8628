//! Durable key-value storage backends for session and plan data
//!
//! The app treats browser-profile storage as its database: a flat,
//! synchronous string-to-string map with no transactions. Everything that
//! persists (session token, cached user, per-user meal plans) goes through
//! the [`KeyValueStore`] trait so tests can run against [`MemoryStore`]
//! while production code uses [`FileStore`].

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use log::warn;

use crate::error::Error;

/// Synchronous string key-value storage.
///
/// Reads are infallible: a backend that cannot produce a value reports
/// absence. Writes may fail (quota, I/O) and the failure must reach the
/// caller.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Delete the value stored under `key`; absent keys are not an error
    fn remove(&self, key: &str) -> Result<(), Error>;
}

/// In-memory store, used by tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).remove(key);
        Ok(())
    }
}

/// File-backed store persisting the whole map as one JSON document.
///
/// Writes rewrite the full file; the in-memory map is the read cache. A
/// second process writing the same file concurrently is last-writer-wins,
/// same as two browser tabs sharing one storage scope.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open a file-backed store, loading any existing content.
    ///
    /// A missing or malformed file starts the store empty rather than
    /// failing, matching the defensive-read policy of the stores built on
    /// top of it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(err) => {
                    warn!("discarding malformed store file {}: {}", path.display(), err);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), Error> {
        let json = serde_json::to_string(entries)?;
        fs::write(&self.path, json).map_err(Error::storage)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value.to_string());
        // Commit to the read cache only once the write hit disk, so a
        // failed write is not visible to later reads.
        self.flush(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let mut updated = entries.clone();
        updated.remove(key);
        self.flush(&updated)?;
        *entries = updated;
        Ok(())
    }
}
