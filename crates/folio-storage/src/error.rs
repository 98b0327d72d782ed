//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage write rejected for key {key}: {reason}")]
    WriteRejected { key: String, reason: String },
}
