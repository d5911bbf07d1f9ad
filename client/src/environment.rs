//! Client environment.
//!
//! This module defines the environment type for dependency injection
//! in client reducers.

use chrono::{DateTime, Utc};
use nicheflow_core::environment::Clock;

use crate::config::ClientConfig;
use crate::providers::{IdentityGateway, KeyValueStore, Notifier, Platform, PreferencesGateway};

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Client environment.
///
/// Contains all external dependencies needed by client reducers. Every
/// capability is `Clone` so effects can move their own handles into spawned
/// futures.
///
/// # Type Parameters
///
/// - `I`: Identity gateway
/// - `P`: Preferences gateway
/// - `K`: Key-value store
/// - `H`: Host platform adapter
/// - `N`: Notifier
/// - `C`: Clock
#[derive(Clone)]
pub struct ClientEnvironment<I, P, K, H, N, C>
where
    I: IdentityGateway + Clone,
    P: PreferencesGateway + Clone,
    K: KeyValueStore + Clone,
    H: Platform + Clone,
    N: Notifier + Clone,
    C: Clock + Clone,
{
    /// Identity gateway (backend auth endpoints).
    pub identity: I,

    /// Preferences gateway (backend preferences endpoints).
    pub preferences: P,

    /// Key-value store (session token and preferences cache).
    pub storage: K,

    /// Host platform adapter (theme, language, cookies).
    pub platform: H,

    /// User-facing notifications.
    pub notifier: N,

    /// Clock for session expiry decisions.
    pub clock: C,

    /// Client configuration.
    pub config: ClientConfig,
}

impl<I, P, K, H, N, C> ClientEnvironment<I, P, K, H, N, C>
where
    I: IdentityGateway + Clone,
    P: PreferencesGateway + Clone,
    K: KeyValueStore + Clone,
    H: Platform + Clone,
    N: Notifier + Clone,
    C: Clock + Clone,
{
    /// Create a new client environment.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        identity: I,
        preferences: P,
        storage: K,
        platform: H,
        notifier: N,
        clock: C,
        config: ClientConfig,
    ) -> Self {
        Self {
            identity,
            preferences,
            storage,
            platform,
            notifier,
            clock,
            config,
        }
    }
}
