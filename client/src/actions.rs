//! Client actions.
//!
//! This module defines all possible actions in the client shell.
//! Actions follow the CQRS pattern: Commands (host intent) and Events
//! (what happened, fed back by effects).

use serde::{Deserialize, Serialize};

use crate::state::{
    Locale, OAuthProvider, Preferences, PreferencesPatch, ProviderDescriptor, Session, ThemeMode,
    UserProfile,
};

/// Client action.
///
/// This enum represents all possible inputs to the client reducers:
/// - **Commands**: Host requests (`Bootstrap`, `CompleteSignIn`, `SetLocale`, ...)
/// - **Events**: Results of async operations (`SessionLoaded`, `PreferencesUpdated`, ...)
///
/// # Architecture Note
///
/// Actions are the **only** way to drive the client shell. The reducers are
/// pure functions: `(State, Action, Env) → (State, Effects)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppAction {
    // ═══════════════════════════════════════════════════════════════════════
    // Lifecycle Commands
    // ═══════════════════════════════════════════════════════════════════════
    /// Start the client: hydrate cached preferences and restore the session.
    ///
    /// # Flow
    ///
    /// 1. Read the preferences cache (or resolve locale defaults)
    /// 2. Read the stored token and validate it against the backend
    /// 3. Feed back `PreferencesHydrated` plus `SessionLoaded` or
    ///    `SessionUnavailable`
    Bootstrap {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,
    },

    /// Install a session the host already obtained out of band.
    ///
    /// Overwrites any existing session unconditionally.
    Login {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// Bearer token for the session.
        access_token: String,

        /// Profile of the signed-in user.
        user: UserProfile,
    },

    /// Drop the session locally without calling the backend.
    Logout {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,
    },

    /// Sign out through the backend, then drop the session.
    SignOut {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Sign-In Commands
    // ═══════════════════════════════════════════════════════════════════════
    /// Fetch the sign-in providers the backend advertises.
    LoadProviders {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,
    },

    /// Begin a provider sign-in by requesting the authorization URL.
    InitiateSignIn {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// Provider to sign in with.
        provider: OAuthProvider,
    },

    /// Complete a provider sign-in with the callback authorization code.
    CompleteSignIn {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// Provider the code came from.
        provider: OAuthProvider,

        /// Authorization code from the provider redirect.
        code: String,
    },

    /// Verify an email address with the token from the verification link.
    VerifyEmail {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// Verification token.
        token: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Preference Commands
    // ═══════════════════════════════════════════════════════════════════════
    /// Fetch the preferences entity from the backend.
    FetchPreferences {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,
    },

    /// Push a partial preferences update to the backend.
    ///
    /// The entity is not touched until `PreferencesUpdated` confirms the
    /// write; an empty patch is a no-op.
    UpdatePreferences {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// Fields to change.
        patch: PreferencesPatch,
    },

    /// Change the UI language.
    ///
    /// Signed in this becomes a one-field `UpdatePreferences`; signed out
    /// it applies locally and projects immediately.
    SetLocale {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// Language to switch to.
        locale: Locale,
    },

    /// Change the theme preference.
    ///
    /// Signed in this becomes a one-field `UpdatePreferences`; signed out
    /// it applies locally and projects immediately.
    SetTheme {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// Theme mode to switch to.
        mode: ThemeMode,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Session Events
    // ═══════════════════════════════════════════════════════════════════════
    /// A stored session was validated during bootstrap.
    SessionLoaded {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// The restored session.
        session: Session,
    },

    /// No stored session could be restored.
    SessionUnavailable {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,
    },

    /// A provider sign-in completed successfully.
    SignedIn {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// The newly established session.
        session: Session,
    },

    /// A provider sign-in failed.
    SignInFailed {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// Why the sign-in failed.
        message: String,
    },

    /// The backend confirmed the sign-out.
    SignedOut {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,
    },

    /// The backend rejected the sign-out.
    SignOutFailed {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// Why the sign-out failed.
        message: String,
    },

    /// An authenticated request was rejected with HTTP 401.
    ///
    /// Idempotent: with no session present this is a no-op, so racing
    /// effects can all report expiry without stacking logouts.
    SessionExpired {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,
    },

    /// The provider list arrived.
    ProvidersLoaded {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// Providers the backend advertises.
        providers: Vec<ProviderDescriptor>,
    },

    /// The provider list could not be fetched.
    ProvidersFailed {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// Why the fetch failed.
        message: String,
    },

    /// The authorization URL for a sign-in is ready.
    AuthorizationUrlReady {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// Provider the URL belongs to.
        provider: OAuthProvider,

        /// URL the host should navigate to.
        url: String,
    },

    /// Email verification succeeded.
    EmailVerified {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// Message returned by the backend.
        message: String,
    },

    /// Email verification failed.
    EmailVerificationFailed {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// Why the verification failed.
        message: String,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Preference Events
    // ═══════════════════════════════════════════════════════════════════════
    /// Cached (or default) preferences were restored during bootstrap.
    PreferencesHydrated {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// Entity to install before any network round trip.
        preferences: Preferences,
    },

    /// The backend returned the preferences entity.
    PreferencesFetched {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// Server copy, merged over the local entity.
        patch: PreferencesPatch,
    },

    /// The preferences fetch failed.
    PreferencesFetchFailed {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// Why the fetch failed.
        message: String,
    },

    /// The backend confirmed a preferences update.
    PreferencesUpdated {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// The patch that was written.
        patch: PreferencesPatch,
    },

    /// The preferences update failed.
    PreferencesUpdateFailed {
        /// Correlation ID for request tracing.
        correlation_id: uuid::Uuid,

        /// Why the update failed.
        message: String,
    },
}
