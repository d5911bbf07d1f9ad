//! Session reducer.
//!
//! This module implements the pure business logic for the session
//! lifecycle: bootstrap, sign-in, sign-out, and expiry.
//!
//! # Flow
//!
//! ```text
//! 1. Bootstrap → hydrate cached preferences + validate stored token
//! 2. SessionLoaded / SignedIn → install session → FetchPreferences
//! 3. SignOut → backend revoke → SignedOut → local teardown
//! 4. SessionExpired (from any 401) → local teardown, idempotent
//! ```
//!
//! Transport errors never reach this reducer as errors: effects translate
//! them into failure events, and `ClientError::Unauthorized` in particular
//! always becomes `SessionExpired`.

use std::marker::PhantomData;

use nicheflow_core::effect::Effect;
use nicheflow_core::environment::Clock;
use nicheflow_core::reducer::Reducer;
use nicheflow_core::{SmallVec, smallvec};

use crate::actions::AppAction;
use crate::constants::{cookies, storage_keys};
use crate::environment::ClientEnvironment;
use crate::providers::{IdentityGateway, KeyValueStore, Notifier, Platform, PreferencesGateway};
use crate::state::{AppState, AuthorizationRequest, Locale, Preferences, PreferencesState, Session};

/// Session reducer.
///
/// Owns the `auth` slice of [`AppState`] plus the logout-time reset of the
/// preferences entity, so one action settles the whole signed-out shape.
#[derive(Debug, Clone)]
pub struct SessionReducer<I, P, K, H, N, C> {
    _env: PhantomData<(I, P, K, H, N, C)>,
}

impl<I, P, K, H, N, C> SessionReducer<I, P, K, H, N, C> {
    /// Create a new session reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self { _env: PhantomData }
    }
}

impl<I, P, K, H, N, C> Default for SessionReducer<I, P, K, H, N, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, P, K, H, N, C> SessionReducer<I, P, K, H, N, C>
where
    I: IdentityGateway + Clone + 'static,
    P: PreferencesGateway + Clone + 'static,
    K: KeyValueStore + Clone + 'static,
    H: Platform + Clone + 'static,
    N: Notifier + Clone + 'static,
    C: Clock + Clone + 'static,
{
    /// Restore the preferences entity from cache, or build locale-aware
    /// defaults when no usable cache exists.
    fn hydrate_preferences_effect(
        env: &ClientEnvironment<I, P, K, H, N, C>,
        correlation_id: uuid::Uuid,
    ) -> Effect<AppAction> {
        let storage = env.storage.clone();
        let platform = env.platform.clone();

        Effect::Future(Box::pin(async move {
            let cached = match storage.get(storage_keys::USER_PREFERENCES) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read preferences cache");
                    None
                }
            };

            let preferences = cached
                .and_then(|raw| match serde_json::from_str::<Preferences>(&raw) {
                    Ok(preferences) => Some(preferences),
                    Err(e) => {
                        tracing::warn!(error = %e, "discarding corrupt preferences cache");
                        None
                    }
                })
                .unwrap_or_else(|| {
                    let cookie = platform.cookie(cookies::LANGUAGE);
                    let locales = platform.system_locales();
                    Preferences {
                        language: Locale::resolve_preferred(cookie.as_deref(), &locales),
                        ..Preferences::default()
                    }
                });

            Some(AppAction::PreferencesHydrated {
                correlation_id,
                preferences,
            })
        }))
    }

    /// Validate the stored token against the backend.
    ///
    /// Any failure, including a rejected token, resolves to
    /// `SessionUnavailable`; bootstrap never surfaces errors to the user.
    fn restore_session_effect(
        env: &ClientEnvironment<I, P, K, H, N, C>,
        correlation_id: uuid::Uuid,
    ) -> Effect<AppAction> {
        let identity = env.identity.clone();
        let storage = env.storage.clone();
        let clock = env.clock.clone();
        let token_key = env.config.auth_cookie_name.clone();

        Effect::Future(Box::pin(async move {
            let token = match storage.get(&token_key) {
                Ok(Some(token)) if !token.is_empty() => token,
                Ok(_) => return Some(AppAction::SessionUnavailable { correlation_id }),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read stored session token");
                    return Some(AppAction::SessionUnavailable { correlation_id });
                }
            };

            match identity.fetch_session(&token).await {
                Ok(user) => {
                    let session = Session::new(user, token, clock.now());
                    Some(AppAction::SessionLoaded {
                        correlation_id,
                        session,
                    })
                }
                Err(e) => {
                    tracing::debug!(error = %e, "stored session rejected");
                    Some(AppAction::SessionUnavailable { correlation_id })
                }
            }
        }))
    }

    /// Feed a follow-up action straight back into the store.
    fn follow_up(action: AppAction) -> Effect<AppAction> {
        Effect::Future(Box::pin(async move { Some(action) }))
    }

    fn persist_token_effect(
        env: &ClientEnvironment<I, P, K, H, N, C>,
        token: String,
    ) -> Effect<AppAction> {
        let storage = env.storage.clone();
        let token_key = env.config.auth_cookie_name.clone();

        Effect::Future(Box::pin(async move {
            if let Err(e) = storage.set(&token_key, &token) {
                tracing::warn!(error = %e, "failed to persist session token");
            }
            None
        }))
    }

    fn clear_token_effect(env: &ClientEnvironment<I, P, K, H, N, C>) -> Effect<AppAction> {
        let storage = env.storage.clone();
        let token_key = env.config.auth_cookie_name.clone();

        Effect::Future(Box::pin(async move {
            if let Err(e) = storage.clear(&token_key) {
                tracing::warn!(error = %e, "failed to clear session token");
            }
            None
        }))
    }

    /// Drop both the token and the preferences cache.
    fn purge_stored_state_effect(env: &ClientEnvironment<I, P, K, H, N, C>) -> Effect<AppAction> {
        let storage = env.storage.clone();
        let token_key = env.config.auth_cookie_name.clone();

        Effect::Future(Box::pin(async move {
            if let Err(e) = storage.clear(&token_key) {
                tracing::warn!(error = %e, "failed to clear session token");
            }
            if let Err(e) = storage.clear(storage_keys::USER_PREFERENCES) {
                tracing::warn!(error = %e, "failed to clear preferences cache");
            }
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

    /// In-memory teardown shared by `Logout`, `SignedOut`, and
    /// `SessionExpired`.
    ///
    /// Resets the whole preferences slice, not just the entity, so an
    /// in-flight fetch interrupted by expiry cannot leave `loading` stuck.
    fn clear_local_session(state: &mut AppState) {
        state.auth.session = None;
        state.auth.loading = false;
        state.preferences = PreferencesState::default();
    }
}

impl<I, P, K, H, N, C> Reducer for SessionReducer<I, P, K, H, N, C>
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
            // Bootstrap
            // ═══════════════════════════════════════════════════════════════════
            AppAction::Bootstrap { correlation_id } => {
                state.auth.loading = true;

                smallvec![
                    Self::hydrate_preferences_effect(env, correlation_id),
                    Self::restore_session_effect(env, correlation_id),
                ]
            }

            AppAction::SessionLoaded {
                correlation_id,
                session,
            } => {
                state.auth.session = Some(session);
                state.auth.loading = false;

                smallvec![Self::follow_up(AppAction::FetchPreferences {
                    correlation_id
                })]
            }

            AppAction::SessionUnavailable { .. } => {
                state.auth.loading = false;

                // A token that failed to validate must not survive until
                // the next bootstrap.
                smallvec![Self::clear_token_effect(env)]
            }

            // ═══════════════════════════════════════════════════════════════════
            // Login / Logout (local, no backend round trip)
            // ═══════════════════════════════════════════════════════════════════
            AppAction::Login {
                access_token, user, ..
            } => {
                let session = Session::new(user, access_token.clone(), env.clock.now());
                state.auth.session = Some(session);
                state.auth.loading = false;

                smallvec![Self::persist_token_effect(env, access_token)]
            }

            AppAction::Logout { .. } => {
                Self::clear_local_session(state);

                smallvec![Self::purge_stored_state_effect(env)]
            }

            // ═══════════════════════════════════════════════════════════════════
            // Sign Out (backend revoke first, then local teardown)
            // ═══════════════════════════════════════════════════════════════════
            AppAction::SignOut { correlation_id } => {
                let Some(session) = &state.auth.session else {
                    return smallvec![Effect::None];
                };

                let identity = env.identity.clone();
                let token = session.access_token.clone();

                smallvec![Effect::Future(Box::pin(async move {
                    match identity.sign_out(&token).await {
                        Ok(()) => Some(AppAction::SignedOut { correlation_id }),
                        Err(e) if e.is_auth_error() => {
                            Some(AppAction::SessionExpired { correlation_id })
                        }
                        Err(e) => Some(AppAction::SignOutFailed {
                            correlation_id,
                            message: e.to_string(),
                        }),
                    }
                }))]
            }

            AppAction::SignedOut { .. } => {
                Self::clear_local_session(state);

                smallvec![Self::purge_stored_state_effect(env)]
            }

            AppAction::SignOutFailed { message, .. } => {
                smallvec![Self::notify_error_effect(env, message)]
            }

            // ═══════════════════════════════════════════════════════════════════
            // Session Expiry
            // ═══════════════════════════════════════════════════════════════════
            AppAction::SessionExpired { .. } => {
                // Idempotent: racing 401s all emit this action, only the
                // first may do any work.
                if state.auth.session.is_none() {
                    return smallvec![];
                }

                Self::clear_local_session(state);

                smallvec![
                    Self::purge_stored_state_effect(env),
                    Self::notify_error_effect(
                        env,
                        "Session expired, please sign in again".to_string(),
                    ),
                ]
            }

            // ═══════════════════════════════════════════════════════════════════
            // Providers
            // ═══════════════════════════════════════════════════════════════════
            AppAction::LoadProviders { correlation_id } => {
                let identity = env.identity.clone();

                smallvec![Effect::Future(Box::pin(async move {
                    match identity.providers().await {
                        Ok(providers) => Some(AppAction::ProvidersLoaded {
                            correlation_id,
                            providers,
                        }),
                        Err(e) => Some(AppAction::ProvidersFailed {
                            correlation_id,
                            message: e.to_string(),
                        }),
                    }
                }))]
            }

            AppAction::ProvidersLoaded { providers, .. } => {
                state.auth.providers = providers;
                smallvec![Effect::None]
            }

            AppAction::ProvidersFailed { message, .. } => {
                smallvec![Self::notify_error_effect(env, message)]
            }

            // ═══════════════════════════════════════════════════════════════════
            // Provider Sign-In
            // ═══════════════════════════════════════════════════════════════════
            AppAction::InitiateSignIn {
                correlation_id,
                provider,
            } => {
                let identity = env.identity.clone();

                smallvec![Effect::Future(Box::pin(async move {
                    match identity.authorization_url(provider).await {
                        Ok(url) => Some(AppAction::AuthorizationUrlReady {
                            correlation_id,
                            provider,
                            url,
                        }),
                        Err(e) => Some(AppAction::SignInFailed {
                            correlation_id,
                            message: e.to_string(),
                        }),
                    }
                }))]
            }

            AppAction::AuthorizationUrlReady { provider, url, .. } => {
                state.auth.pending_authorization = Some(AuthorizationRequest { provider, url });
                smallvec![Effect::None]
            }

            AppAction::CompleteSignIn {
                correlation_id,
                provider,
                code,
            } => {
                state.auth.loading = true;

                let identity = env.identity.clone();

                smallvec![Effect::Future(Box::pin(async move {
                    match identity.exchange_code(provider, &code).await {
                        Ok(response) => {
                            let session = Session {
                                user: response.user,
                                access_token: response.access_token,
                                expires_at: response.session.expires_at,
                                provider: Some(provider),
                            };
                            Some(AppAction::SignedIn {
                                correlation_id,
                                session,
                            })
                        }
                        Err(e) => Some(AppAction::SignInFailed {
                            correlation_id,
                            message: e.to_string(),
                        }),
                    }
                }))]
            }

            AppAction::SignedIn {
                correlation_id,
                session,
            } => {
                let token = session.access_token.clone();
                state.auth.session = Some(session);
                state.auth.pending_authorization = None;
                state.auth.loading = false;

                smallvec![
                    Self::persist_token_effect(env, token),
                    Self::follow_up(AppAction::FetchPreferences { correlation_id }),
                ]
            }

            AppAction::SignInFailed { message, .. } => {
                state.auth.loading = false;

                smallvec![Self::notify_error_effect(env, message)]
            }

            // ═══════════════════════════════════════════════════════════════════
            // Email Verification
            // ═══════════════════════════════════════════════════════════════════
            AppAction::VerifyEmail {
                correlation_id,
                token,
            } => {
                let identity = env.identity.clone();

                smallvec![Effect::Future(Box::pin(async move {
                    match identity.verify_email(&token).await {
                        Ok(message) => Some(AppAction::EmailVerified {
                            correlation_id,
                            message,
                        }),
                        Err(e) => Some(AppAction::EmailVerificationFailed {
                            correlation_id,
                            message: e.to_string(),
                        }),
                    }
                }))]
            }

            AppAction::EmailVerified { message, .. } => {
                smallvec![Self::notify_success_effect(env, message)]
            }

            AppAction::EmailVerificationFailed { message, .. } => {
                smallvec![Self::notify_error_effect(env, message)]
            }

            // Preference actions belong to the preferences reducer.
            _ => smallvec![Effect::None],
        }
    }
}
