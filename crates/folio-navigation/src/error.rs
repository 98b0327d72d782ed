//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Page has no sections")]
    NoSections,

    #[error("Section at position {0} has an empty id")]
    EmptySlug(usize),

    #[error("Duplicate section id: {0}")]
    DuplicateSlug(String),

    #[error("Section index {index} out of bounds (0..{len})")]
    OutOfBounds { index: usize, len: usize },

    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("Invalid navigator configuration: {0}")]
    InvalidConfig(String),
}
