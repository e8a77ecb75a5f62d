//! File-backed key/value store
//!
//! Stores each key as its own file inside an XDG-compliant cache directory
//! (`~/.cache/skillport/` on Linux).

use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError};

/// Key/value store persisting one file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where values are stored
    dir: PathBuf,
}

impl FileStore {
    /// Creates a FileStore in the XDG cache directory for skillport
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "skillport")?;
        Some(Self::with_dir(project_dirs.cache_dir().to_path_buf()))
    }

    /// Creates a FileStore rooted at a custom directory
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Directory holding the stored values
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path to the file backing `key`
    fn item_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.item_path(key)).ok()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.item_path(key), value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = FileStore::with_dir(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    #[test]
    fn test_set_item_creates_file_in_store_directory() {
        let (store, temp_dir) = create_test_store();

        store.set_item("cached_reviews", "{\"reviews\":[]}").expect("Write should succeed");

        let expected_path = temp_dir.path().join("cached_reviews.json");
        assert!(expected_path.exists(), "Backing file should exist");
        let content = fs::read_to_string(&expected_path).expect("Should read file");
        assert_eq!(content, "{\"reviews\":[]}");
    }

    #[test]
    fn test_get_item_returns_none_for_missing_key() {
        let (store, _temp_dir) = create_test_store();
        assert!(store.get_item("nonexistent").is_none());
    }

    #[test]
    fn test_set_item_overwrites_previous_value() {
        let (store, _temp_dir) = create_test_store();

        store.set_item("key", "first").expect("First write should succeed");
        store.set_item("key", "second").expect("Second write should succeed");

        assert_eq!(store.get_item("key").as_deref(), Some("second"));
    }

    #[test]
    fn test_set_item_creates_directory_if_missing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested_path = temp_dir.path().join("nested").join("store");
        let store = FileStore::with_dir(nested_path.clone());

        store.set_item("nested_key", "value").expect("Write should succeed");

        assert!(nested_path.join("nested_key.json").exists());
    }

    #[test]
    fn test_keys_are_sanitized_into_file_names() {
        let (store, temp_dir) = create_test_store();

        store.set_item("../escape/attempt", "x").expect("Write should succeed");

        assert!(temp_dir.path().join("___escape_attempt.json").exists());
        assert_eq!(store.get_item("../escape/attempt").as_deref(), Some("x"));
    }

    #[test]
    fn test_set_item_fails_when_directory_is_a_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "not a dir").expect("Should create blocker file");
        let store = FileStore::with_dir(blocker);

        assert!(matches!(store.set_item("key", "value"), Err(StorageError::Io(_))));
    }

    #[test]
    fn test_new_creates_xdg_compliant_path() {
        if let Some(store) = FileStore::new() {
            let path_str = store.dir().to_string_lossy();
            assert!(path_str.contains("skillport"), "Store path should contain project name");
        }
        // Test passes if new() returns None (e.g., no home directory in CI)
    }
}
