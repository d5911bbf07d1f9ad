//! Reducers for the client state machine.
//!
//! [`SessionReducer`] owns the auth slice and the logout-time reset,
//! [`PreferencesReducer`] owns the preferences slice and its projections.
//! [`AppReducer`] composes the two behind a single [`Reducer`] so the
//! store runs one feedback loop over [`AppState`].

pub mod preferences;
pub mod session;

pub use preferences::PreferencesReducer;
pub use session::SessionReducer;

use nicheflow_core::SmallVec;
use nicheflow_core::effect::Effect;
use nicheflow_core::environment::Clock;
use nicheflow_core::reducer::Reducer;

use crate::actions::AppAction;
use crate::environment::ClientEnvironment;
use crate::providers::{IdentityGateway, KeyValueStore, Notifier, Platform, PreferencesGateway};
use crate::state::AppState;

/// Root reducer: routes each action to the reducer that owns it.
///
/// Both sub-reducers operate on the full [`AppState`] because some
/// transitions cross slices (signing out resets preferences, preference
/// fetches read the session token).
#[derive(Debug, Clone)]
pub struct AppReducer<I, P, K, H, N, C> {
    session: SessionReducer<I, P, K, H, N, C>,
    preferences: PreferencesReducer<I, P, K, H, N, C>,
}

impl<I, P, K, H, N, C> AppReducer<I, P, K, H, N, C> {
    /// Create a new root reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            session: SessionReducer::new(),
            preferences: PreferencesReducer::new(),
        }
    }
}

impl<I, P, K, H, N, C> Default for AppReducer<I, P, K, H, N, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, P, K, H, N, C> Reducer for AppReducer<I, P, K, H, N, C>
where
    I: IdentityGateway + Clone + 'static,
    P: PreferencesGateway + Clone + 'static,
    K: KeyValueStore + Clone + 'static,
    H: Platform + Clone + 'static,
    N: Notifier + Clone + 'static,
    C: Clock + Clone + 'static,
{
    type State = AppState;
    type Action = AppAction;
    type Environment = ClientEnvironment<I, P, K, H, N, C>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match &action {
            AppAction::FetchPreferences { .. }
            | AppAction::UpdatePreferences { .. }
            | AppAction::SetLocale { .. }
            | AppAction::SetTheme { .. }
            | AppAction::PreferencesHydrated { .. }
            | AppAction::PreferencesFetched { .. }
            | AppAction::PreferencesFetchFailed { .. }
            | AppAction::PreferencesUpdated { .. }
            | AppAction::PreferencesUpdateFailed { .. } => {
                self.preferences.reduce(state, action, env)
            }
            _ => self.session.reduce(state, action, env),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::config::ClientConfig;
    use crate::mocks::{
        MemoryStorage, MockIdentityGateway, MockPlatform, MockPreferencesGateway,
        RecordingNotifier,
    };
    use crate::state::{Preferences, Session, ThemeMode, UserId, UserProfile};
    use nicheflow_testing::{FixedClock, test_clock};

    type TestEnv = ClientEnvironment<
        MockIdentityGateway,
        MockPreferencesGateway,
        MemoryStorage,
        MockPlatform,
        RecordingNotifier,
        FixedClock,
    >;

    type TestReducer = AppReducer<
        MockIdentityGateway,
        MockPreferencesGateway,
        MemoryStorage,
        MockPlatform,
        RecordingNotifier,
        FixedClock,
    >;

    fn test_env() -> TestEnv {
        ClientEnvironment::new(
            MockIdentityGateway::new(),
            MockPreferencesGateway::new(),
            MemoryStorage::new(),
            MockPlatform::new(),
            RecordingNotifier::new(),
            test_clock(),
            ClientConfig::new(),
        )
    }

    #[test]
    fn test_routes_preference_actions() {
        let reducer = TestReducer::new();
        let env = test_env();
        let mut state = AppState::default();
        state.auth.loading = false;

        let _ = reducer.reduce(
            &mut state,
            AppAction::SetTheme {
                correlation_id: uuid::Uuid::new_v4(),
                mode: ThemeMode::Dark,
            },
            &env,
        );

        assert_eq!(state.preferences.preferences.theme, ThemeMode::Dark);
    }

    #[test]
    fn test_routes_session_actions() {
        let reducer = TestReducer::new();
        let env = test_env();
        let mut state = AppState::default();

        let user = UserProfile {
            id: UserId(3),
            email: "ada@example.com".to_string(),
            ..UserProfile::default()
        };

        let _ = reducer.reduce(
            &mut state,
            AppAction::Login {
                correlation_id: uuid::Uuid::new_v4(),
                access_token: "token-1".to_string(),
                user,
            },
            &env,
        );

        assert!(state.auth.session.is_some());
        assert!(!state.auth.loading);
    }

    #[test]
    fn test_logout_crosses_slices() {
        let reducer = TestReducer::new();
        let env = test_env();
        let mut state = AppState::default();
        state.auth.session = Some(Session::new(
            UserProfile::default(),
            "token-1".to_string(),
            test_clock().now(),
        ));
        state.preferences.preferences.theme = ThemeMode::Dark;

        let _ = reducer.reduce(
            &mut state,
            AppAction::Logout {
                correlation_id: uuid::Uuid::new_v4(),
            },
            &env,
        );

        assert!(state.auth.session.is_none());
        assert_eq!(state.preferences.preferences, Preferences::default());
    }
}
