//! Dataset loading errors.

use crate::domain::{DomainError, LoadId};

/// Errors that can occur while loading the postings and stops datasets.
///
/// All of these are fatal at startup; there is no partial load.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Source could not be opened or read
    #[error("failed to read {name}: {message}")]
    Unreadable { name: String, message: String },

    /// Header row lacks a required column
    #[error("{name}: missing required column {column}")]
    MissingColumn { name: String, column: &'static str },

    /// A cell failed type validation
    #[error("{name} row {row}, column {column}: {error}")]
    InvalidCell {
        name: String,
        row: usize,
        column: &'static str,
        error: DomainError,
    },

    /// Two postings share a load identifier
    #[error("{name}: duplicate load id {load_id}")]
    DuplicateLoad { name: String, load_id: LoadId },
}

impl LoadError {
    pub(crate) fn unreadable(name: &str, err: impl std::fmt::Display) -> Self {
        LoadError::Unreadable {
            name: name.to_string(),
            message: err.to_string(),
        }
    }
}
