//! Key-value persistence
//!
//! The scene keeps three entries in the browser's LocalStorage:
//! - `gameState`: `"false"` while the puzzle window is open
//! - `customKeys`: JSON key bindings
//! - `enigmeSolved`: `"true"` once the puzzle page reports success
//!
//! Flags are plain `"true"` / `"false"` strings so the puzzle page can
//! write them without any shared code.

use std::cell::RefCell;
use std::collections::HashMap;

use thiserror::Error;

/// Storage keys
pub mod keys {
    pub const GAME_STATE: &str = "gameState";
    pub const CUSTOM_KEYS: &str = "customKeys";
    pub const ENIGME_SOLVED: &str = "enigmeSolved";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage write failed for '{key}': {reason}")]
    Write { key: String, reason: String },
}

/// String key-value store with LocalStorage semantics (interior mutability, no transactions)
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory store (native builds and tests)
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// `window.localStorage` (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Result<Self, StorageError> {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { inner })
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.inner
            .remove_item(key)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }
}

/// Read a `"true"` / `"false"` flag (exact match). Missing or unreadable
/// values give `None`.
pub fn read_flag(store: &dyn Storage, key: &str) -> Option<bool> {
    let raw = store.get_item(key)?;
    match raw.as_str() {
        "true" => Some(true),
        "false" => Some(false),
        other => {
            log::warn!("Ignoring non-boolean value {:?} for '{}'", other, key);
            None
        }
    }
}

pub fn write_flag(store: &dyn Storage, key: &str, value: bool) -> Result<(), StorageError> {
    store.set_item(key, if value { "true" } else { "false" })
}
