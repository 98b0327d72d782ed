//! `localStorage` settings store

use web_sys::{Storage, Window};

use folio_storage::{Result, SettingsStore, StorageError};

/// Browser `localStorage`. A window without storage (privacy mode, sandboxed
/// frame) yields a store whose calls all fail.
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn from_window(window: &Window) -> Self {
        let storage = match window.local_storage() {
            Ok(Some(storage)) => Some(storage),
            Ok(None) => {
                tracing::warn!("localStorage not provided");
                None
            }
            Err(e) => {
                tracing::warn!(error = ?e, "localStorage access denied");
                None
            }
        };
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| StorageError::Unavailable("localStorage".to_string()))
    }
}

impl SettingsStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::WriteRejected {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }
}
