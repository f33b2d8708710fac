//! Key-value backends for saved state
//!
//! LocalStorage on the web, a plain map everywhere else.

use std::collections::HashMap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A string key-value store with one value per key
pub trait SnapshotStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistError>;
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - progress will not be saved");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&web_sys::Storage, PersistError> {
        self.storage.as_ref().ok_or(PersistError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl SnapshotStore for LocalStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| PersistError::Backend(format!("{:?}", e)))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| PersistError::Backend(format!("{:?}", e)))
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| PersistError::Backend(format!("{:?}", e)))
    }
}
