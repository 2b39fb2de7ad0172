//! Key-value storage backends
//!
//! The store only needs "get/set/remove a string by key". Backends:
//! - `MemoryStorage`: in-process map (tests, fallback when the browser refuses storage)
//! - `LocalStorage`: `window.localStorage` (wasm32)
//! - `JsonFileStorage`: a single JSON object on disk (native)

use std::collections::HashMap;
use std::fmt;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStorage;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

/// Failure talking to a storage backend
#[derive(Debug)]
pub enum StorageError {
    /// The backend cannot be reached at all
    Unavailable(String),
    /// A read or write on `key` was refused
    Access { key: String, message: String },
    /// Filesystem error (file backend)
    Io(std::io::Error),
    /// The backing file is not a JSON object of strings (file backend)
    Format(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
            StorageError::Access { key, message } => {
                write!(f, "storage access to '{key}' failed: {message}")
            }
            StorageError::Io(e) => write!(f, "storage io error: {e}"),
            StorageError::Format(e) => write!(f, "storage file is malformed: {e}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Format(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Format(e)
    }
}

/// String slots addressed by key
pub trait KeyValueStorage {
    /// Value under `key`, `None` if nothing was ever stored
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value under `key`
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Drop `key`; removing a missing key is not an error
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory backend
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every write from now on (simulates a full or locked-down storage quota)
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn check_writable(&self, key: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::Access {
                key: key.to_string(),
                message: "storage is read-only".to_string(),
            });
        }
        Ok(())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.check_writable(key)?;
        self.items.remove(key);
        Ok(())
    }
}
