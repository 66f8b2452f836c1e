//! Credential and sync-time accessors.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use super::kv::{KeyValueStore, StorageError};

/// Storage key of the Attio API key.
pub const API_KEY: &str = "attio_api_key";

/// Storage key of the last successful capture, in epoch milliseconds.
pub const LAST_SYNC: &str = "last_sync_timestamp";

/// Typed view over the extension's key-value storage.
#[derive(Debug)]
pub struct CredentialStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> CredentialStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Stored API key; an empty string counts as absent.
    pub fn api_key(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .store
            .get(API_KEY)?
            .and_then(|v| v.as_str().map(|s| s.to_string()))
            .filter(|key| !key.is_empty()))
    }

    pub fn set_api_key(&self, api_key: &str) -> Result<(), StorageError> {
        self.store.set(API_KEY, Value::String(api_key.to_string()))
    }

    pub fn clear_api_key(&self) -> Result<(), StorageError> {
        self.store.remove(API_KEY)
    }

    pub fn is_authenticated(&self) -> Result<bool, StorageError> {
        Ok(self.api_key()?.is_some())
    }

    /// Record now as the last sync time.
    pub fn update_last_sync(&self) -> Result<DateTime<Utc>, StorageError> {
        let now = Utc::now();
        self.store.set(LAST_SYNC, Value::from(now.timestamp_millis()))?;
        Ok(now)
    }

    pub fn last_sync(&self) -> Result<Option<DateTime<Utc>>, StorageError> {
        Ok(self
            .store
            .get(LAST_SYNC)?
            .and_then(|v| v.as_i64())
            .filter(|millis| *millis > 0)
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::kv::MemoryStore;
    use serde_json::json;

    fn store() -> CredentialStore<MemoryStore> {
        CredentialStore::new(MemoryStore::new())
    }

    #[test]
    fn test_storage_keys() {
        assert_eq!(API_KEY, "attio_api_key");
        assert_eq!(LAST_SYNC, "last_sync_timestamp");
    }

    #[test]
    fn test_api_key_lifecycle() {
        let creds = store();
        assert_eq!(creds.api_key().unwrap(), None);
        assert!(!creds.is_authenticated().unwrap());

        creds.set_api_key("test-key").unwrap();
        assert_eq!(creds.api_key().unwrap().as_deref(), Some("test-key"));
        assert!(creds.is_authenticated().unwrap());

        creds.clear_api_key().unwrap();
        assert_eq!(creds.api_key().unwrap(), None);
    }

    #[test]
    fn test_empty_api_key_is_unauthenticated() {
        let creds = store();
        creds.set_api_key("").unwrap();
        assert!(!creds.is_authenticated().unwrap());

        creds.inner().set(API_KEY, json!(42)).unwrap();
        assert_eq!(creds.api_key().unwrap(), None);
    }

    #[test]
    fn test_last_sync() {
        let creds = store();
        assert_eq!(creds.last_sync().unwrap(), None);

        let written = creds.update_last_sync().unwrap();
        let read = creds.last_sync().unwrap().unwrap();
        assert_eq!(read.timestamp_millis(), written.timestamp_millis());
    }
}
