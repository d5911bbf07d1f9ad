//! Mock provider implementations for testing.
//!
//! This module provides simple, in-memory implementations of all provider
//! traits for use in unit and integration tests. Gateways are scriptable:
//! tests seed sessions, exchanges, and forced failures, then assert on the
//! recorded calls.

use crate::error::ClientError;

pub mod identity;
pub mod notifier;
pub mod platform;
pub mod preferences;
pub mod storage;

pub use identity::MockIdentityGateway;
pub use notifier::RecordingNotifier;
pub use platform::{CookieWrite, MockPlatform};
pub use preferences::MockPreferencesGateway;
pub use storage::MemoryStorage;

/// Error used when a mock's internal lock is poisoned.
pub(crate) fn poisoned() -> ClientError {
    ClientError::Storage("mock lock poisoned".to_string())
}
