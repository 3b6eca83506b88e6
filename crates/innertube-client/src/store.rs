//! Persistence seam for the scraped API key.
//!
//! The client never caches the key itself: every lookup reads through this
//! trait, and only a successful refresh writes to it.

use std::sync::Mutex;

use crate::InnertubeError;

/// Single-record key store. Implementations upsert under a fixed key.
pub trait KeyStore: Send + Sync {
    /// Current key, or `None` when nothing usable is stored.
    fn load_key(&self) -> Result<Option<String>, InnertubeError>;

    /// Create or overwrite the stored key.
    fn save_key(&self, key: &str) -> Result<(), InnertubeError>;
}

/// Process-local store, for embedding without a database.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    key: Mutex<Option<String>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: Mutex::new(Some(key.into())),
        }
    }
}

impl KeyStore for MemoryKeyStore {
    fn load_key(&self) -> Result<Option<String>, InnertubeError> {
        let key = self
            .key
            .lock()
            .map_err(|_| InnertubeError::Store("key store lock poisoned".into()))?;
        Ok(key.clone().filter(|k| !k.is_empty()))
    }

    fn save_key(&self, key: &str) -> Result<(), InnertubeError> {
        let mut slot = self
            .key
            .lock()
            .map_err(|_| InnertubeError::Store("key store lock poisoned".into()))?;
        *slot = Some(key.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_upserts_in_place() {
        let store = MemoryKeyStore::new();
        assert!(store.load_key().unwrap().is_none());

        store.save_key("ABC123").unwrap();
        store.save_key("XYZ").unwrap();
        assert_eq!(store.load_key().unwrap().as_deref(), Some("XYZ"));
    }

    #[test]
    fn empty_key_reads_as_missing() {
        let store = MemoryKeyStore::with_key("");
        assert!(store.load_key().unwrap().is_none());
    }
}
