//! # Storage Abstraction
//!
//! The client persists a handful of small records (dashboard layout, theme)
//! in the browser's key-value storage. Components receive a [`KeyValueStore`]
//! instead of reaching for `localStorage` directly, so the same logic runs
//! against [`MemoryStore`] in tests.

use serde::{de::DeserializeOwned, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("failed to write `{key}`: {reason}")]
    WriteFailed { key: String, reason: String },
    #[error("stored record `{key}` is malformed: {reason}")]
    Corrupt { key: String, reason: String },
    #[error("failed to serialize `{key}`: {reason}")]
    Serialize { key: String, reason: String },
}

/// String key-value storage with whole-record overwrites.
pub trait KeyValueStore {
    /// Raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Read a JSON record. `Ok(None)` when nothing is stored.
pub fn read_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key) {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            }),
    }
}

/// Serialize a record to JSON and overwrite `key` with it.
pub fn write_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Serialize {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    store.set(key, &raw)
}

/// In-memory store. Clones share the same entries, which makes a clone handed
/// to a fresh component behave like the page after a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes always fail, e.g. storage quota exhausted.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    /// Seed a value without going through [`KeyValueStore::set`].
    pub fn insert(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::WriteFailed {
                key: key.to_string(),
                reason: "store is read-only".to_string(),
            });
        }
        self.insert(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip_through_store() {
        let store = MemoryStore::new();
        write_json(&store, "order", &vec!["a", "b"]).unwrap();
        let order: Option<Vec<String>> = read_json(&store, "order").unwrap();
        assert_eq!(order, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_missing_record_is_none() {
        let store = MemoryStore::new();
        let order: Option<Vec<String>> = read_json(&store, "order").unwrap();
        assert!(order.is_none());
    }

    #[test]
    fn test_corrupt_record_is_reported() {
        let store = MemoryStore::new();
        store.insert("order", "[not json");
        let result: Result<Option<Vec<String>>, _> = read_json(&store, "order");
        assert!(matches!(result, Err(StorageError::Corrupt { key, .. }) if key == "order"));
    }

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let reloaded = store.clone();
        store.set("theme", "dark").unwrap();
        assert_eq!(reloaded.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_read_only_store_rejects_writes() {
        let store = MemoryStore::read_only();
        assert!(matches!(
            store.set("theme", "dark"),
            Err(StorageError::WriteFailed { .. })
        ));
        assert!(store.get("theme").is_none());
    }
}
