//! Error types for the session module.

use thiserror::Error;

/// Errors raised by a [`SessionStorage`](crate::SessionStorage) backend.
///
/// The session store never surfaces these to its callers; they are logged
/// and the in-memory transition proceeds regardless.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted record could not be decoded.
    #[error("corrupt storage record: {0}")]
    Corrupt(String),
}

impl StorageError {
    #[must_use]
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::Corrupt(message.into())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Corrupt(e.to_string())
    }
}
