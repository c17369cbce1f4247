//! Durable client-side key-value storage.
//!
//! The browser original keeps its handful of persisted settings (locale,
//! theme, auth token) in localStorage. Here the same contract is a small
//! `Storage` trait with two implementations: a JSON file on disk for real
//! use, and a pure in-memory map for tests and for the degraded mode when
//! the file cannot be opened.
//!
//! Stores inject `Arc<dyn Storage>` so each test can use an isolated
//! instance instead of sharing global state.

use crate::error::StorageError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// String key-value storage with localStorage semantics.
///
/// Reads are served from memory and never fail. Writes may fail (disk full,
/// permissions); callers decide whether that is fatal — for the settings
/// stores it never is.
pub trait Storage: Send + Sync {
    /// Get the stored value for `key`, if any.
    fn read(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing an absent key is a no-op.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage backed by a single JSON file holding a flat string map.
///
/// The file is read once at construction; afterwards every read is answered
/// from the in-memory map and every write rewrites the whole file. The map
/// holds a few short strings, so rewriting is cheap.
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Open (or create) the storage file at `path`.
    ///
    /// A missing file starts empty. A corrupt file is an error so the caller
    /// can decide between aborting and degrading to [`MemoryStorage`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => HashMap::new(),
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|source| StorageError::Corrupt {
                    path: path.display().to_string(),
                    source,
                })?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(source) => {
                return Err(StorageError::Open {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(entries)
            .unwrap_or_else(|_| "{}".to_string());
        std::fs::write(&self.path, json).map_err(|source| StorageError::Write {
            path: self.path.display().to_string(),
            source,
        })
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().expect("storage mutex poisoned");
        entries.get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().expect("storage mutex poisoned");
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().expect("storage mutex poisoned");
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.flush(&entries)
    }
}

/// Purely in-memory storage. Used in tests and as the degraded fallback when
/// durable storage is unavailable.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for the common `Arc<dyn Storage>` injection shape.
    pub fn shared() -> Arc<dyn Storage> {
        Arc::new(Self::new())
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().expect("storage mutex poisoned");
        entries.get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().expect("storage mutex poisoned");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().expect("storage mutex poisoned");
        entries.remove(key);
        Ok(())
    }
}

/// Open file storage at `path`, falling back to memory-only storage if the
/// file cannot be used. The degradation is logged once and the session
/// continues without persistence, matching the behavior of a browser with
/// storage disabled.
pub fn open_or_memory(path: impl AsRef<Path>) -> Arc<dyn Storage> {
    match FileStorage::open(path.as_ref()) {
        Ok(storage) => Arc::new(storage),
        Err(err) => {
            tracing::warn!("client storage unavailable, continuing in-memory: {err}");
            Arc::new(MemoryStorage::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // ==================== FileStorage Tests ====================

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("settings.json");

        let storage = FileStorage::open(&path).expect("open");
        storage.write("locale", "ja").expect("write");
        assert_eq!(storage.read("locale"), Some("ja".to_string()));

        // A fresh handle must see the persisted value.
        let reopened = FileStorage::open(&path).expect("reopen");
        assert_eq!(reopened.read("locale"), Some("ja".to_string()));
    }

    #[test]
    fn test_file_storage_missing_file_starts_empty() {
        let dir = TempDir::new().expect("tempdir");
        let storage = FileStorage::open(dir.path().join("absent.json")).expect("open");
        assert_eq!(storage.read("anything"), None);
    }

    #[test]
    fn test_file_storage_corrupt_file_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json at all {{{").expect("write corrupt file");

        let result = FileStorage::open(&path);
        assert!(matches!(result, Err(StorageError::Corrupt { .. })));
    }

    #[test]
    fn test_file_storage_overwrite() {
        let dir = TempDir::new().expect("tempdir");
        let storage = FileStorage::open(dir.path().join("s.json")).expect("open");

        storage.write("theme", "light").expect("write");
        storage.write("theme", "dark").expect("write");
        assert_eq!(storage.read("theme"), Some("dark".to_string()));
    }

    #[test]
    fn test_file_storage_remove() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("s.json");
        let storage = FileStorage::open(&path).expect("open");

        storage.write("auth_token", "abc123").expect("write");
        storage.remove("auth_token").expect("remove");
        assert_eq!(storage.read("auth_token"), None);

        let reopened = FileStorage::open(&path).expect("reopen");
        assert_eq!(reopened.read("auth_token"), None);
    }

    #[test]
    fn test_file_storage_remove_absent_key_is_noop() {
        let dir = TempDir::new().expect("tempdir");
        let storage = FileStorage::open(dir.path().join("s.json")).expect("open");
        storage.remove("never-set").expect("remove absent");
    }

    #[test]
    fn test_file_storage_multiple_keys() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("s.json");
        let storage = FileStorage::open(&path).expect("open");

        storage.write("locale", "en").expect("write");
        storage.write("theme", "dark").expect("write");

        let reopened = FileStorage::open(&path).expect("reopen");
        assert_eq!(reopened.read("locale"), Some("en".to_string()));
        assert_eq!(reopened.read("theme"), Some("dark".to_string()));
    }

    // ==================== MemoryStorage Tests ====================

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        storage.write("locale", "ko").expect("write");
        assert_eq!(storage.read("locale"), Some("ko".to_string()));
        storage.remove("locale").expect("remove");
        assert_eq!(storage.read("locale"), None);
    }

    #[test]
    fn test_memory_storage_read_absent() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read("locale"), None);
    }

    // ==================== Fallback Tests ====================

    #[test]
    fn test_open_or_memory_degrades_on_unusable_path() {
        let dir = TempDir::new().expect("tempdir");
        // A directory is not a readable settings file.
        let storage = open_or_memory(dir.path());
        // Degraded storage still honors the contract.
        assert_eq!(storage.read("locale"), None);
    }
}
