//! Durable storage trait for persisted sessions.

use crate::error::StorageError;

/// Well-known storage keys.
///
/// Absence of either key means "no persisted session".
pub mod keys {
    /// Bearer token string.
    pub const TOKEN: &str = "token";
    /// Display email of the authenticated user.
    pub const USER_EMAIL: &str = "userEmail";
}

/// Durable key-value storage scoped to the application.
///
/// Implementations must survive process restarts (file-backed) or at least
/// the lifetime of the store they are injected into (in-memory).
///
/// ```ignore
/// storage.set(keys::TOKEN, "eyJ...")?;
/// assert_eq!(storage.get(keys::TOKEN)?.as_deref(), Some("eyJ..."));
/// storage.remove(keys::TOKEN)?;
/// ```
pub trait SessionStorage: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing medium cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
