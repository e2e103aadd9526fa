//! In-memory store, the injectable fake for tests and ephemeral runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::Store;
use crate::error::StorageError;

/// Clones share the same underlying map, so a test can hold one handle
/// while the domain type owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let map = self
            .map
            .lock()
            .map_err(|_| StorageError::QueryFailed("store lock poisoned".into()))?;
        Ok(map.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self
            .map
            .lock()
            .map_err(|_| StorageError::QueryFailed("store lock poisoned".into()))?;
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self
            .map
            .lock()
            .map_err(|_| StorageError::QueryFailed("store lock poisoned".into()))?;
        map.remove(key);
        Ok(())
    }
}
