//! Store errors.

use thiserror::Error;

/// Store error types.
///
/// Only the write path surfaces these. Scans and sweeps recover locally and
/// log instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error (unwritable directory, disk full, failed rename).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Unusable file extension.
    #[error("Invalid file extension: {0}")]
    InvalidExtension(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
