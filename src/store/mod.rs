//! Durable key/value storage
//!
//! A small string-keyed store shaped like browser local storage:
//! every value is a string, and callers decide how to encode it.
//! - `FileStorage` keeps one file per key inside a directory
//! - `MemoryStorage` keeps everything in a shared map (used in tests)

pub mod favorites;
pub mod theme;

pub use favorites::Favorites;
pub use theme::{ThemeManager, ThemeMode};

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
#[cfg(test)]
use std::{collections::HashMap, sync::Mutex};
use thiserror::Error;

/// Storage key for the favorites list
pub const FAVORITES_KEY: &str = "quoteFavs";

/// Storage key for the theme preference
pub const THEME_KEY: &str = "theme";

/// Errors raised by a storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode value for key '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
}

/// String-valued key/value store
pub trait Storage {
    /// Read a value; `Ok(None)` when the key was never written
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Shared handle used by the favorites and theme stores
pub type SharedStorage = Arc<dyn Storage>;

/// File-backed storage: `<dir>/<key>` holds the raw value
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default storage directory: ~/.local/share/quotebox
    pub fn default_dir() -> Result<PathBuf> {
        let dir = dirs::data_dir()
            .context("Could not determine data directory")?
            .join("quotebox");
        Ok(dir)
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        // Keys are fixed identifiers; refuse anything that could escape the directory
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { key: key.to_string(), source }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        let io_err = |source| StorageError::Io { key: key.to_string(), source };

        fs::create_dir_all(&self.dir).map_err(io_err)?;

        // Write to a sibling file first so a crash never leaves a half-written value
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)?;
        Ok(())
    }
}

/// In-memory storage; clones share the same map
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Storage whose every operation fails, for exercising the swallow-and-log paths
    pub(crate) struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            })
        }

        fn set_item(&self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                key: key.to_string(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            })
        }
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.get_item(THEME_KEY).unwrap(), None);

        storage.set_item(THEME_KEY, "dark").unwrap();
        assert_eq!(storage.get_item(THEME_KEY).unwrap().as_deref(), Some("dark"));

        storage.set_item(THEME_KEY, "light").unwrap();
        assert_eq!(storage.get_item(THEME_KEY).unwrap().as_deref(), Some("light"));
        assert!(!dir.path().join("nested").join("theme.tmp").exists());
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        assert!(matches!(
            storage.set_item("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.get_item(""), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_memory_storage_clones_share_state() {
        let a = MemoryStorage::new();
        let b = a.clone();

        a.set_item(FAVORITES_KEY, "[]").unwrap();
        assert_eq!(b.get_item(FAVORITES_KEY).unwrap().as_deref(), Some("[]"));
    }
}
