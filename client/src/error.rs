//! Error types for client operations.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Error taxonomy for the client shell.
///
/// Covers transport failures, application-level envelope errors, and
/// host-side concerns such as storage and configuration. Effects inspect
/// these variants to decide which feedback action to emit.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    // ═══════════════════════════════════════════════════════════
    // Transport Errors
    // ═══════════════════════════════════════════════════════════

    /// Request never produced a usable response.
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    // ═══════════════════════════════════════════════════════════
    // Application Errors
    // ═══════════════════════════════════════════════════════════

    /// Envelope arrived with a non-success application code.
    #[error("API error {code}: {message}")]
    Api {
        /// Application-level code carried by the envelope
        code: i64,
        /// Human-readable message from the envelope
        message: String,
    },

    /// Backend rejected the bearer token (HTTP 401).
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Message returned with the rejection
        message: String,
    },

    /// Response body could not be interpreted.
    #[error("Decode error: {0}")]
    Decode(String),

    // ═══════════════════════════════════════════════════════════
    // Host Errors
    // ═══════════════════════════════════════════════════════════

    /// Key-value store operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Provider identifier is not one the client understands.
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Client configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Returns `true` if this error means the session is no longer valid.
    ///
    /// Effects use this to route failures into the session-expiry path
    /// instead of surfacing a generic failure message.
    ///
    /// # Examples
    ///
    /// ```
    /// # use nicheflow_client::ClientError;
    /// let err = ClientError::Unauthorized { message: "token revoked".to_string() };
    /// assert!(err.is_auth_error());
    /// assert!(!ClientError::Timeout.is_auth_error());
    /// ```
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns `true` if this error originated below the application layer.
    ///
    /// # Examples
    ///
    /// ```
    /// # use nicheflow_client::ClientError;
    /// assert!(ClientError::Timeout.is_transport());
    /// assert!(ClientError::Network("connection refused".to_string()).is_transport());
    /// assert!(!ClientError::Decode("bad json".to_string()).is_transport());
    /// ```
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
