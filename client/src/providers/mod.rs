//! Capability providers.
//!
//! This module defines traits for all external dependencies of the client
//! shell. Reducers depend only on these traits; hosts supply concrete
//! implementations for their platform.
//!
//! # Architecture
//!
//! Providers are **interfaces**, not implementations. Two kinds exist:
//!
//! - **Gateways** ([`IdentityGateway`], [`PreferencesGateway`]): async
//!   calls to the backend API, invoked from effects.
//! - **Host capabilities** ([`KeyValueStore`], [`Platform`], [`Notifier`]):
//!   synchronous calls into the embedding host (browser, desktop app, test
//!   harness), also invoked from effects so reducers stay pure.
//!
//! This enables:
//! - **Testing**: deterministic in-memory mocks
//! - **Production**: REST adapters plus the host's real storage and UI
//! - **Development**: instrumented versions (logging, tracing)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::UserProfile;

pub mod identity;
pub mod notifier;
pub mod platform;
pub mod preferences;
pub mod rest;
pub mod storage;

// Re-export provider traits
pub use identity::IdentityGateway;
pub use notifier::Notifier;
pub use platform::Platform;
pub use preferences::PreferencesGateway;
pub use rest::{RestIdentityGateway, RestPreferencesGateway};
pub use storage::KeyValueStore;

/// Session metadata returned alongside a sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    /// Backend session identifier.
    pub id: String,

    /// User the session belongs to.
    pub user_id: u64,

    /// When the backend will stop honoring the session.
    pub expires_at: DateTime<Utc>,
}

/// Payload of a completed authorization code exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallbackResponse {
    /// Session created by the backend.
    pub session: SessionDescriptor,

    /// Profile of the user that signed in.
    pub user: UserProfile,

    /// Bearer token for subsequent requests.
    pub access_token: String,
}
