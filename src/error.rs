//! Error types for the campaign-board library.
//!
//! This module provides custom error types using `thiserror` for better error handling
//! and more specific error messages throughout the application.
//!
//! Lookup misses (unknown user, absent bulletin) are deliberately *not* errors:
//! those operations return `Ok(None)`. The variants here cover transport failures,
//! malformed table data, and invalid caller input.

use thiserror::Error;

/// Errors that can occur in the campaign-board application.
#[derive(Error, Debug)]
pub enum BoardError {
    /// A table could not be read from the backing store
    #[error("failed to fetch table '{table}': {cause}")]
    Fetch {
        /// Name of the table that could not be read
        table: String,
        /// Human-readable cause of the failure
        cause: String,
    },

    /// An append or delete against the backing store failed
    #[error("write to table '{table}' failed: {cause}")]
    Write {
        /// Name of the table the write targeted
        table: String,
        /// Human-readable cause of the failure
        cause: String,
    },

    /// A row is missing required columns or carries unusable values
    #[error("malformed record in table '{table}' (row {row}): {cause}")]
    MalformedRecord {
        /// Table the offending row belongs to
        table: String,
        /// Zero-based data-row position of the offending row
        row: usize,
        /// What was wrong with the row
        cause: String,
    },

    /// Caller-supplied input failed validation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// File I/O errors
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// General error with context
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Result with BoardError
pub type Result<T> = std::result::Result<T, BoardError>;

impl From<anyhow::Error> for BoardError {
    fn from(err: anyhow::Error) -> Self {
        BoardError::Other(err.to_string())
    }
}
