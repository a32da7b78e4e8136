//! In-memory store and typed JSON access over any [`KeyValueStore`].

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::traits::KeyValueStore;

/// A [`KeyValueStore`] held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

/// Read and decode `key`, propagating both store and decode failures.
pub fn try_read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Json {
                key: key.to_string(),
                source,
            }),
        None => Ok(None),
    }
}

/// Read and decode `key`. Unreadable or malformed values are logged and
/// treated as absent.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    match try_read_json(store, key) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("ignoring stored value for '{key}': {e}");
            None
        }
    }
}

/// Read `key` ahead of rewriting it.
///
/// A malformed value is logged and read as absent so the write can replace
/// it. Any other failure is returned: writing after a failed read would
/// discard whatever is actually stored.
pub fn read_for_update<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match try_read_json(store, key) {
        Err(e @ StoreError::Json { .. }) => {
            tracing::warn!("replacing malformed value for '{key}': {e}");
            Ok(None)
        }
        other => other,
    }
}

/// Encode and write `value` under `key`.
pub fn try_write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Json {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)?;
    tracing::debug!("wrote {} bytes to '{key}'", raw.len());
    Ok(())
}

/// Best-effort write: failures are logged and swallowed. Returns whether the
/// write landed.
pub fn write_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> bool {
    match try_write_json(store, key, value) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("failed to persist '{key}': {e}");
            false
        }
    }
}
