//! Persistent key/value storage
//!
//! A small abstraction over "get a string, set a string" storage, modelled on
//! browser local storage. The review cache is written against the
//! [`KeyValueStore`] trait so it can run on disk in the real client and in
//! memory under test.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use thiserror::Error;

/// A store shared behind a trait object
pub type SharedStore = Arc<dyn KeyValueStore + Send + Sync>;

/// Errors raised when the backing store rejects a write
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying filesystem operation failed
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The store refused the value (read-only, quota exceeded, ...)
    #[error("storage rejected write for key '{0}'")]
    Rejected(String),
}

/// String key/value storage with local-storage semantics
///
/// Reads never fail: a missing or unreadable key is simply absent.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, if any
    fn get_item(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}
