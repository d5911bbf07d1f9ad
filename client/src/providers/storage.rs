//! Key-value store trait.

use crate::error::Result;

/// Durable string storage supplied by the host.
///
/// This is the single persistence seam for the client: the session token
/// and the preferences cache both live behind it. Browser hosts back it
/// with `localStorage`, desktop hosts with a settings file, tests with an
/// in-memory map.
///
/// Methods are synchronous; effects wrap calls so reducers stay pure.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Returns
    ///
    /// `None` if the key has never been set or was cleared.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the underlying store fails.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the underlying store fails.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key` entirely.
    ///
    /// Clearing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Storage` if the underlying store fails.
    fn clear(&self, key: &str) -> Result<()>;
}
