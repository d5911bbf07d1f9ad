//! Preferences reducer.
//!
//! Owns the `preferences` slice of [`AppState`]: fetching the server copy,
//! confirmed updates, the cache in host storage, and the theme/language
//! projections onto the platform.
//!
//! # Update discipline
//!
//! `UpdatePreferences` never touches the entity. The patch is sent to the
//! backend first and applied only when `PreferencesUpdated` confirms it, so
//! a failed save can never leave the UI showing settings the server does
//! not have. `SetLocale` and `SetTheme` follow the same path while a
//! session is live and fall back to a purely local write when signed out.

use std::marker::PhantomData;

use nicheflow_core::effect::Effect;
use nicheflow_core::environment::Clock;
use nicheflow_core::reducer::Reducer;
use nicheflow_core::{SmallVec, smallvec};

use crate::actions::AppAction;
use crate::constants::{cookies, storage_keys};
use crate::environment::ClientEnvironment;
use crate::providers::{IdentityGateway, KeyValueStore, Notifier, Platform, PreferencesGateway};
use crate::state::{AppState, Locale, Preferences, PreferencesPatch, ThemeMode};

/// Preferences reducer.
#[derive(Debug, Clone)]
pub struct PreferencesReducer<I, P, K, H, N, C> {
    _env: PhantomData<(I, P, K, H, N, C)>,
}

impl<I, P, K, H, N, C> PreferencesReducer<I, P, K, H, N, C> {
    /// Create a new preferences reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self { _env: PhantomData }
    }
}

impl<I, P, K, H, N, C> Default for PreferencesReducer<I, P, K, H, N, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, P, K, H, N, C> PreferencesReducer<I, P, K, H, N, C>
where
    I: IdentityGateway + Clone + 'static,
    P: PreferencesGateway + Clone + 'static,
    K: KeyValueStore + Clone + 'static,
    H: Platform + Clone + 'static,
    N: Notifier + Clone + 'static,
    C: Clock + Clone + 'static,
{
    /// Write the full entity to the host cache.
    fn persist_preferences_effect(
        env: &ClientEnvironment<I, P, K, H, N, C>,
        preferences: Preferences,
    ) -> Effect<AppAction> {
        let storage = env.storage.clone();

        Effect::Future(Box::pin(async move {
            match serde_json::to_string(&preferences) {
                Ok(raw) => {
                    if let Err(e) = storage.set(storage_keys::USER_PREFERENCES, &raw) {
                        tracing::warn!(error = %e, "failed to persist preferences cache");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to serialize preferences cache");
                }
            }
            None
        }))
    }

    /// Resolve the mode against the platform theme and apply it.
    fn project_theme_effect(
        env: &ClientEnvironment<I, P, K, H, N, C>,
        mode: ThemeMode,
    ) -> Effect<AppAction> {
        let platform = env.platform.clone();

        Effect::Future(Box::pin(async move {
            let resolved = mode.resolve(platform.system_theme());
            platform.apply_theme(resolved);
            None
        }))
    }

    /// Apply the locale and refresh the long-lived language cookie.
    fn project_language_effect(
        env: &ClientEnvironment<I, P, K, H, N, C>,
        locale: Locale,
    ) -> Effect<AppAction> {
        let platform = env.platform.clone();

        Effect::Future(Box::pin(async move {
            platform.apply_language(locale);
            platform.set_cookie(cookies::LANGUAGE, locale.as_str(), cookies::LANGUAGE_TTL_DAYS);
            None
        }))
    }

    fn notify_success_effect(
        env: &ClientEnvironment<I, P, K, H, N, C>,
        message: String,
    ) -> Effect<AppAction> {
        let notifier = env.notifier.clone();
        Effect::Future(Box::pin(async move {
            notifier.success(&message);
            None
        }))
    }

    fn notify_error_effect(
        env: &ClientEnvironment<I, P, K, H, N, C>,
        message: String,
    ) -> Effect<AppAction> {
        let notifier = env.notifier.clone();
        Effect::Future(Box::pin(async move {
            notifier.error(&message);
            None
        }))
    }
}

impl<I, P, K, H, N, C> Reducer for PreferencesReducer<I, P, K, H, N, C>
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
        match action {
            // ═══════════════════════════════════════════════════════════════════
            // Fetch
            // ═══════════════════════════════════════════════════════════════════
            AppAction::FetchPreferences { correlation_id } => {
                state.preferences.loading = true;
                state.preferences.error = None;

                let gateway = env.preferences.clone();
                let bearer = state
                    .auth
                    .session
                    .as_ref()
                    .map(|session| session.access_token.clone());

                smallvec![Effect::Future(Box::pin(async move {
                    match gateway.fetch(bearer.as_deref()).await {
                        Ok(patch) => Some(AppAction::PreferencesFetched {
                            correlation_id,
                            patch,
                        }),
                        Err(e) if e.is_auth_error() => {
                            Some(AppAction::SessionExpired { correlation_id })
                        }
                        Err(e) => Some(AppAction::PreferencesFetchFailed {
                            correlation_id,
                            message: e.to_string(),
                        }),
                    }
                }))]
            }

            AppAction::PreferencesFetched { patch, .. } => {
                state.preferences.preferences.apply(&patch);
                state.preferences.loading = false;
                state.preferences.error = None;

                smallvec![
                    Self::persist_preferences_effect(env, state.preferences.preferences.clone()),
                    Self::project_theme_effect(env, state.preferences.preferences.theme),
                    Self::project_language_effect(env, state.preferences.preferences.language),
                ]
            }

            AppAction::PreferencesFetchFailed { message, .. } => {
                state.preferences.loading = false;
                state.preferences.error = Some(message.clone());

                smallvec![Self::notify_error_effect(env, message)]
            }

            // ═══════════════════════════════════════════════════════════════════
            // Confirmed Update
            // ═══════════════════════════════════════════════════════════════════
            AppAction::UpdatePreferences {
                correlation_id,
                patch,
            } => {
                if patch.is_empty() {
                    return smallvec![Effect::None];
                }

                state.preferences.loading = true;
                state.preferences.error = None;

                let gateway = env.preferences.clone();
                let bearer = state
                    .auth
                    .session
                    .as_ref()
                    .map(|session| session.access_token.clone());

                // The entity stays untouched until the backend confirms.
                smallvec![Effect::Future(Box::pin(async move {
                    let result = gateway.update(bearer.as_deref(), &patch).await;
                    match result {
                        Ok(()) => Some(AppAction::PreferencesUpdated {
                            correlation_id,
                            patch,
                        }),
                        Err(e) if e.is_auth_error() => {
                            Some(AppAction::SessionExpired { correlation_id })
                        }
                        Err(e) => Some(AppAction::PreferencesUpdateFailed {
                            correlation_id,
                            message: e.to_string(),
                        }),
                    }
                }))]
            }

            AppAction::PreferencesUpdated { patch, .. } => {
                state.preferences.preferences.apply(&patch);
                state.preferences.loading = false;

                let mut effects: SmallVec<[Effect<AppAction>; 4]> = smallvec![
                    Self::persist_preferences_effect(env, state.preferences.preferences.clone()),
                    Self::notify_success_effect(env, "Preferences updated".to_string()),
                ];

                // Only re-project what the patch actually changed.
                if patch.theme.is_some() {
                    effects.push(Self::project_theme_effect(
                        env,
                        state.preferences.preferences.theme,
                    ));
                }
                if patch.language.is_some() {
                    effects.push(Self::project_language_effect(
                        env,
                        state.preferences.preferences.language,
                    ));
                }

                effects
            }

            AppAction::PreferencesUpdateFailed { message, .. } => {
                state.preferences.loading = false;
                state.preferences.error = Some(message.clone());

                smallvec![Self::notify_error_effect(env, message)]
            }

            // ═══════════════════════════════════════════════════════════════════
            // Locale / Theme Commands
            // ═══════════════════════════════════════════════════════════════════
            AppAction::SetLocale {
                correlation_id,
                locale,
            } => {
                if state.auth.is_authenticated(env.clock.now()) {
                    return self.reduce(
                        state,
                        AppAction::UpdatePreferences {
                            correlation_id,
                            patch: PreferencesPatch::language(locale),
                        },
                        env,
                    );
                }

                state.preferences.preferences.language = locale;

                smallvec![
                    Self::persist_preferences_effect(env, state.preferences.preferences.clone()),
                    Self::project_language_effect(env, locale),
                ]
            }

            AppAction::SetTheme {
                correlation_id,
                mode,
            } => {
                if state.auth.is_authenticated(env.clock.now()) {
                    return self.reduce(
                        state,
                        AppAction::UpdatePreferences {
                            correlation_id,
                            patch: PreferencesPatch::theme(mode),
                        },
                        env,
                    );
                }

                state.preferences.preferences.theme = mode;

                smallvec![
                    Self::persist_preferences_effect(env, state.preferences.preferences.clone()),
                    Self::project_theme_effect(env, mode),
                ]
            }

            // ═══════════════════════════════════════════════════════════════════
            // Hydration
            // ═══════════════════════════════════════════════════════════════════
            AppAction::PreferencesHydrated { preferences, .. } => {
                state.preferences.preferences = preferences;

                // The cache is the source here; no write-back.
                smallvec![
                    Self::project_theme_effect(env, state.preferences.preferences.theme),
                    Self::project_language_effect(env, state.preferences.preferences.language),
                ]
            }

            // Session actions belong to the session reducer.
            _ => smallvec![Effect::None],
        }
    }
}
