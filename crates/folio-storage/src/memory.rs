//! In-memory settings store

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::{Result, SettingsStore, StorageError};

/// Process-local store. Clones share the same map.
///
/// A store created with [`MemoryStore::unavailable`] fails every call, which
/// is how a host with storage disabled looks to the rest of the site.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<String, String>>>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            values: Arc::default(),
            unavailable: true,
        }
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.unavailable {
            return Err(StorageError::Unavailable("storage disabled".to_string()));
        }
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.unavailable {
            return Err(StorageError::WriteRejected {
                key: key.to_string(),
                reason: "storage disabled".to_string(),
            });
        }
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            values: Arc::clone(&self.values),
            unavailable: self.unavailable,
        }
    }
}
