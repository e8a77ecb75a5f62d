//! In-memory key/value store

use std::collections::HashMap;
use std::sync::Mutex;

use super::{KeyValueStore, StorageError};

/// Key/value store held in process memory
///
/// Used for tests and for runs where no cache directory is available.
/// A read-only store rejects every write, which mimics a full quota.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
    read_only: bool,
}

impl MemoryStore {
    /// Creates an empty, writable store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that rejects all writes
    pub fn read_only() -> Self {
        Self {
            items: Mutex::default(),
            read_only: true,
        }
    }

    /// Seeds a raw value, bypassing the read-only flag
    pub fn with_item(self, key: &str, value: &str) -> Self {
        if let Ok(mut items) = self.items.lock() {
            items.insert(key.to_string(), value.to_string());
        }
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().ok()?.get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Rejected(key.to_string()));
        }
        let mut items = self
            .items
            .lock()
            .map_err(|_| StorageError::Rejected(key.to_string()))?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
