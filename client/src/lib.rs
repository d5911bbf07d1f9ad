//! # NicheFlow Client
//!
//! Headless client shell for NicheFlow: session lifecycle, provider
//! sign-in, user preferences, and the layout projection, implemented as
//! a single unidirectional state machine.
//!
//! ## Features
//!
//! - **Headless**: No UI; hosts render [`AppState`] and dispatch [`AppAction`]
//! - **Composable**: Session and preferences reducers behind one [`AppReducer`]
//! - **Deterministic**: Pure reducers, injected clock, explicit effects
//! - **Host-agnostic**: Storage, platform, and notification traits at the edges
//! - **Testable**: Mock gateways run every flow at memory speed
//!
//! ## Architecture
//!
//! ```text
//! Action → AppReducer → (AppState, Effects) → Gateways/Platform → More Actions
//! ```
//!
//! ## Example: Bootstrap and Sign-In
//!
//! ```rust,ignore
//! use nicheflow_client::*;
//! use nicheflow_runtime::Store;
//!
//! let config = ClientConfig::from_env()?;
//! let api = ApiClient::new(&config)?;
//! let env = ClientEnvironment::new(
//!     providers::RestIdentityGateway::new(api.clone()),
//!     providers::RestPreferencesGateway::new(api),
//!     storage,
//!     platform,
//!     notifier,
//!     SystemClock,
//!     config,
//! );
//!
//! let store = Store::new(AppState::default(), AppReducer::new(), env);
//!
//! // 1. Restore cached preferences and any stored session
//! store.send(AppAction::Bootstrap { correlation_id }).await?;
//!
//! // 2. Complete a provider sign-in with the callback code
//! store.send(AppAction::CompleteSignIn { correlation_id, provider, code }).await?;
//!
//! // 3. Project the layout for the current route
//! let shell = store.state(|s| select_shell(&s.auth, now, "/dashboard")).await;
//! ```

// Public modules
pub mod actions;
pub mod api;
pub mod config;
pub mod constants;
pub mod environment;
pub mod error;
pub mod layout;
pub mod providers;
pub mod reducers;
pub mod state;

#[cfg(feature = "test-utils")]
pub mod mocks;

// Re-export main types for convenience
pub use actions::AppAction;
pub use api::ApiClient;
pub use config::ClientConfig;
pub use environment::{ClientEnvironment, SystemClock};
pub use error::{ClientError, Result};
pub use layout::{Shell, select_shell};
pub use reducers::{AppReducer, PreferencesReducer, SessionReducer};
pub use state::{
    AppState, AuthState, Locale, OAuthProvider, Preferences, PreferencesPatch, Session, ThemeMode,
    UserId, UserProfile,
};
