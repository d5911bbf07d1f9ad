//! Client configuration.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Environment variable naming the API base URL.
const ENV_API_URL: &str = "NICHEFLOW_API_URL";
/// Environment variable naming the request timeout in milliseconds.
const ENV_API_TIMEOUT_MS: &str = "NICHEFLOW_API_TIMEOUT_MS";
/// Environment variable naming the auth token cookie.
const ENV_AUTH_COOKIE_NAME: &str = "NICHEFLOW_AUTH_COOKIE_NAME";
/// Environment variable naming the auth cookie domain.
const ENV_AUTH_COOKIE_DOMAIN: &str = "NICHEFLOW_AUTH_COOKIE_DOMAIN";

/// Configuration for the client shell.
///
/// Carries the API endpoint, request timeout, and the cookie identity used
/// to persist the session token. All fields have production defaults and can
/// be overridden through the builder methods or [`ClientConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the backend API, without a trailing slash.
    pub api_base_url: String,

    /// Per-request timeout applied by the HTTP client.
    pub api_timeout: Duration,

    /// Name of the cookie (and storage key) holding the session token.
    pub auth_cookie_name: String,

    /// Domain scoping the auth cookie.
    pub auth_cookie_domain: String,
}

impl ClientConfig {
    /// Creates a configuration with production defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            api_base_url: "https://api.getnicheflow.com".to_string(),
            api_timeout: Duration::from_millis(10_000),
            auth_cookie_name: "nicheflow_token".to_string(),
            auth_cookie_domain: "localhost".to_string(),
        }
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_api_timeout(mut self, timeout: Duration) -> Self {
        self.api_timeout = timeout;
        self
    }

    /// Sets the auth cookie name.
    #[must_use]
    pub fn with_auth_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.auth_cookie_name = name.into();
        self
    }

    /// Sets the auth cookie domain.
    #[must_use]
    pub fn with_auth_cookie_domain(mut self, domain: impl Into<String>) -> Self {
        self.auth_cookie_domain = domain.into();
        self
    }

    /// Builds a configuration from environment variables.
    ///
    /// Reads `NICHEFLOW_API_URL`, `NICHEFLOW_API_TIMEOUT_MS`,
    /// `NICHEFLOW_AUTH_COOKIE_NAME`, and `NICHEFLOW_AUTH_COOKIE_DOMAIN`.
    /// Unset variables fall back to the defaults from [`ClientConfig::new`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if `NICHEFLOW_API_TIMEOUT_MS` is set
    /// but is not a valid number of milliseconds.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new();

        if let Ok(url) = std::env::var(ENV_API_URL) {
            config.api_base_url = url;
        }
        if let Ok(raw) = std::env::var(ENV_API_TIMEOUT_MS) {
            let millis: u64 = raw.parse().map_err(|_| {
                ClientError::Config(format!("{ENV_API_TIMEOUT_MS} must be a number, got {raw:?}"))
            })?;
            config.api_timeout = Duration::from_millis(millis);
        }
        if let Ok(name) = std::env::var(ENV_AUTH_COOKIE_NAME) {
            config.auth_cookie_name = name;
        }
        if let Ok(domain) = std::env::var(ENV_AUTH_COOKIE_DOMAIN) {
            config.auth_cookie_domain = domain;
        }

        Ok(config)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
