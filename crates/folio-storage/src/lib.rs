//! Folio Storage Layer
//!
//! Key-value persistence for site preferences. The browser build backs this
//! with `localStorage`; tests use the in-memory store.

mod error;
mod memory;

pub use error::StorageError;
pub use memory::MemoryStore;

pub type Result<T> = std::result::Result<T, StorageError>;

/// A string key-value store.
///
/// Implementations take `&self` so a store can be shared between the
/// components that read and write preferences.
pub trait SettingsStore {
    /// Read a value, `None` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: SettingsStore + ?Sized> SettingsStore for std::rc::Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
