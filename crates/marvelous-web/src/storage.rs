//! Durable key/value storage.
//!
//! The browser's `localStorage` is the only durable backend. [`MemoryStorage`] stands in when it
//! is unavailable (private browsing, disabled storage) so the app keeps working for the session.

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    rc::Rc,
};

use serde::{Serialize, de::DeserializeOwned};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage rejected the operation: {0}")]
    Rejected(String),

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub trait KeyValueStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value under `key` in a single write.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl KeyValueStore for web_sys::Storage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.get_item(key)
            .map_err(|e| StorageError::Rejected(format!("{:?}", e)))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.set_item(key, value)
            .map_err(|e| StorageError::Rejected(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.remove_item(key)
            .map_err(|e| StorageError::Rejected(format!("{:?}", e)))
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
    reject_writes: Cell<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following write fail, like a full quota does.
    #[cfg(test)]
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }
}

impl KeyValueStore for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.reject_writes.get() {
            return Err(StorageError::Rejected("quota exceeded".to_string()));
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// The page's `localStorage`, or an in-memory store when the browser denies it.
pub fn durable() -> Rc<dyn KeyValueStore> {
    match web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
        Some(storage) => Rc::new(storage),
        None => {
            warn!("localStorage is unavailable, nothing will survive a reload");
            Rc::new(MemoryStorage::new())
        }
    }
}

/// Reads and decodes a JSON record. Missing, unreadable and malformed records all read as `None`.
pub fn read_json<T: DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match storage.read(key) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!("failed to read {}: {}", key, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("discarding malformed {}: {}", key, e);
            None
        }
    }
}

pub fn write_json<T: Serialize + ?Sized>(
    storage: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    storage.write(key, &raw)
}
