//! `localStorage` behind the shared [`KeyValueStore`] seam.

use shared::{KeyValueStore, StorageError};
use web_sys::Storage;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

impl LocalStore {
    fn storage() -> Option<Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = Self::storage().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|err| StorageError::WriteFailed {
                key: key.to_string(),
                reason: format!("{:?}", err),
            })
    }
}
