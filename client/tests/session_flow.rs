//! Integration tests for the session lifecycle
//!
//! Drives the full store (reducers, effects, mock gateways) through
//! bootstrap, provider sign-in, sign-out, and expiry, and asserts on the
//! resulting state and the calls recorded by the mocks.
//!
//! Terminal events are broadcast before they are reduced, so tests sleep
//! briefly after `send_and_wait_for` whenever they assert on the terminal
//! action's own state changes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::time::Duration;

use chrono::Duration as TimeDelta;
use nicheflow_client::mocks::{
    MemoryStorage, MockIdentityGateway, MockPlatform, MockPreferencesGateway, RecordingNotifier,
};
use nicheflow_client::providers::{CallbackResponse, KeyValueStore, SessionDescriptor};
use nicheflow_client::state::ProviderDescriptor;
use nicheflow_client::{
    AppAction, AppReducer, AppState, ClientConfig, ClientEnvironment, ClientError, Locale,
    OAuthProvider, PreferencesPatch, ThemeMode, UserId, UserProfile,
};
use nicheflow_core::environment::Clock;
use nicheflow_runtime::Store;
use nicheflow_testing::{FixedClock, test_clock};
use uuid::Uuid;

// ============================================================================
// Test Fixtures
// ============================================================================

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

type TestStore = Store<AppState, AppAction, TestEnv, TestReducer>;

struct Harness {
    store: TestStore,
    identity: MockIdentityGateway,
    preferences: MockPreferencesGateway,
    storage: MemoryStorage,
    platform: MockPlatform,
    notifier: RecordingNotifier,
    config: ClientConfig,
}

fn harness() -> Harness {
    harness_with(MemoryStorage::new(), MockPlatform::new())
}

fn harness_with(storage: MemoryStorage, platform: MockPlatform) -> Harness {
    harness_from(MockIdentityGateway::new(), storage, platform)
}

fn harness_from(
    identity: MockIdentityGateway,
    storage: MemoryStorage,
    platform: MockPlatform,
) -> Harness {
    let preferences = MockPreferencesGateway::new();
    let notifier = RecordingNotifier::new();
    let config = ClientConfig::new();

    let env = ClientEnvironment::new(
        identity.clone(),
        preferences.clone(),
        storage.clone(),
        platform.clone(),
        notifier.clone(),
        test_clock(),
        config.clone(),
    );

    Harness {
        store: Store::new(AppState::default(), AppReducer::new(), env),
        identity,
        preferences,
        storage,
        platform,
        notifier,
        config,
    }
}

fn test_user() -> UserProfile {
    UserProfile {
        id: UserId(7),
        email: "ada@example.com".to_string(),
        username: "ada".to_string(),
        ..UserProfile::default()
    }
}

/// Install a session directly and wait for the token to be persisted.
async fn sign_in(harness: &Harness, token: &str) -> UserProfile {
    let user = test_user();
    harness.identity.grant_session(token, user.clone());

    let mut handle = harness
        .store
        .send(AppAction::Login {
            correlation_id: Uuid::new_v4(),
            access_token: token.to_string(),
            user: user.clone(),
        })
        .await
        .expect("send Login");
    handle.wait().await;

    user
}

/// Let in-flight feedback actions and fire-and-forget effects settle.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

// ============================================================================
// Bootstrap
// ============================================================================

/// A stored token that the backend accepts restores the session and
/// triggers a preferences fetch.
#[tokio::test]
async fn test_bootstrap_restores_stored_session() {
    let harness = harness_with(
        MemoryStorage::new().with_entry("nicheflow_token", "token-1"),
        MockPlatform::new(),
    );
    harness.identity.grant_session("token-1", test_user());

    let result = harness
        .store
        .send_and_wait_for(
            AppAction::Bootstrap {
                correlation_id: Uuid::new_v4(),
            },
            |action| matches!(action, AppAction::PreferencesFetched { .. }),
            Duration::from_secs(1),
        )
        .await;
    assert!(result.is_ok());
    settle().await;

    let now = test_clock().now();
    let (authenticated, loading, email) = harness
        .store
        .state(|s| {
            (
                s.auth.is_authenticated(now),
                s.auth.loading,
                s.auth.session.as_ref().map(|sess| sess.user.email.clone()),
            )
        })
        .await;

    assert!(authenticated);
    assert!(!loading);
    assert_eq!(email.as_deref(), Some("ada@example.com"));
}

/// A stored token the backend rejects is dropped; bootstrap lands
/// signed out without surfacing an error.
#[tokio::test]
async fn test_bootstrap_with_rejected_token_lands_signed_out() {
    let harness = harness_with(
        MemoryStorage::new().with_entry("nicheflow_token", "stale-token"),
        MockPlatform::new(),
    );
    // No session granted: the gateway treats the token as unknown.

    let result = harness
        .store
        .send_and_wait_for(
            AppAction::Bootstrap {
                correlation_id: Uuid::new_v4(),
            },
            |action| matches!(action, AppAction::SessionUnavailable { .. }),
            Duration::from_secs(1),
        )
        .await;
    assert!(result.is_ok());
    settle().await;

    let (session, loading) = harness
        .store
        .state(|s| (s.auth.session.clone(), s.auth.loading))
        .await;
    assert!(session.is_none());
    assert!(!loading);

    // The rejected token must not survive until the next bootstrap.
    assert_eq!(
        harness.storage.get(&harness.config.auth_cookie_name).unwrap(),
        None
    );
    // Silent failure: no user-facing notification.
    assert!(harness.notifier.errors().is_empty());
}

/// With no cache and no token, hydration resolves the locale from the
/// platform and the projections run.
#[tokio::test]
async fn test_bootstrap_hydrates_locale_from_platform() {
    let harness = harness_with(
        MemoryStorage::new(),
        MockPlatform::new().with_system_locales(vec!["zh-CN".to_string(), "en-US".to_string()]),
    );

    let result = harness
        .store
        .send_and_wait_for(
            AppAction::Bootstrap {
                correlation_id: Uuid::new_v4(),
            },
            |action| matches!(action, AppAction::PreferencesHydrated { .. }),
            Duration::from_secs(1),
        )
        .await;
    assert!(result.is_ok());
    settle().await;

    let language = harness
        .store
        .state(|s| s.preferences.preferences.language)
        .await;
    assert_eq!(language, Locale::Zh);
    assert_eq!(harness.platform.applied_languages(), vec![Locale::Zh]);
}

/// The language cookie outranks the platform locale list.
#[tokio::test]
async fn test_bootstrap_prefers_language_cookie() {
    let harness = harness_with(
        MemoryStorage::new(),
        MockPlatform::new()
            .with_system_locales(vec!["zh-CN".to_string()])
            .with_cookie("language", "en"),
    );

    let result = harness
        .store
        .send_and_wait_for(
            AppAction::Bootstrap {
                correlation_id: Uuid::new_v4(),
            },
            |action| matches!(action, AppAction::PreferencesHydrated { .. }),
            Duration::from_secs(1),
        )
        .await;
    assert!(result.is_ok());
    settle().await;

    let language = harness
        .store
        .state(|s| s.preferences.preferences.language)
        .await;
    assert_eq!(language, Locale::En);
}

// ============================================================================
// Provider Sign-In
// ============================================================================

/// Full code exchange: session installed, token persisted, preferences
/// fetched and projected.
#[tokio::test]
async fn test_complete_sign_in_roundtrip() {
    let harness = harness();
    let now = test_clock().now();

    harness.identity.script_exchange(
        "code-1",
        CallbackResponse {
            session: SessionDescriptor {
                id: "sess-1".to_string(),
                user_id: 7,
                expires_at: now + TimeDelta::hours(24),
            },
            user: test_user(),
            access_token: "token-xyz".to_string(),
        },
    );
    harness
        .preferences
        .set_remote(PreferencesPatch::theme(ThemeMode::Dark));

    let result = harness
        .store
        .send_and_wait_for(
            AppAction::CompleteSignIn {
                correlation_id: Uuid::new_v4(),
                provider: OAuthProvider::Google,
                code: "code-1".to_string(),
            },
            |action| matches!(action, AppAction::PreferencesFetched { .. }),
            Duration::from_secs(1),
        )
        .await;
    assert!(result.is_ok());
    settle().await;

    let (provider, theme, loading) = harness
        .store
        .state(|s| {
            (
                s.auth.session.as_ref().and_then(|sess| sess.provider),
                s.preferences.preferences.theme,
                s.auth.loading,
            )
        })
        .await;

    assert_eq!(provider, Some(OAuthProvider::Google));
    assert_eq!(theme, ThemeMode::Dark);
    assert!(!loading);

    // Token persisted for the next bootstrap.
    assert_eq!(
        harness.storage.get(&harness.config.auth_cookie_name).unwrap(),
        Some("token-xyz".to_string())
    );
}

/// A bad authorization code surfaces a notification and settles loading,
/// leaving the client signed out.
#[tokio::test]
async fn test_complete_sign_in_with_bad_code_fails() {
    let harness = harness();

    let result = harness
        .store
        .send_and_wait_for(
            AppAction::CompleteSignIn {
                correlation_id: Uuid::new_v4(),
                provider: OAuthProvider::GitHub,
                code: "wrong".to_string(),
            },
            |action| matches!(action, AppAction::SignInFailed { .. }),
            Duration::from_secs(1),
        )
        .await;
    assert!(result.is_ok());
    settle().await;

    let (session, loading) = harness
        .store
        .state(|s| (s.auth.session.clone(), s.auth.loading))
        .await;
    assert!(session.is_none());
    assert!(!loading);
    assert_eq!(harness.notifier.errors().len(), 1);
}

/// Listing providers and requesting an authorization URL populate the
/// auth slice for the host to render.
#[tokio::test]
async fn test_provider_listing_and_authorization_url() {
    let identity = MockIdentityGateway::new()
        .with_provider(ProviderDescriptor {
            id: "google".to_string(),
            name: "Google".to_string(),
            kind: "oauth".to_string(),
            scopes: vec!["profile".to_string(), "email".to_string()],
        })
        .with_provider(ProviderDescriptor {
            id: "github".to_string(),
            name: "GitHub".to_string(),
            kind: "oauth".to_string(),
            scopes: vec![],
        });
    let harness = harness_from(identity, MemoryStorage::new(), MockPlatform::new());

    let result = harness
        .store
        .send_and_wait_for(
            AppAction::LoadProviders {
                correlation_id: Uuid::new_v4(),
            },
            |action| matches!(action, AppAction::ProvidersLoaded { .. }),
            Duration::from_secs(1),
        )
        .await;
    assert!(result.is_ok());
    settle().await;

    let providers = harness.store.state(|s| s.auth.providers.clone()).await;
    assert_eq!(providers.len(), 2);
    assert_eq!(providers[0].id, "google");

    let result = harness
        .store
        .send_and_wait_for(
            AppAction::InitiateSignIn {
                correlation_id: Uuid::new_v4(),
                provider: OAuthProvider::Google,
            },
            |action| matches!(action, AppAction::AuthorizationUrlReady { .. }),
            Duration::from_secs(1),
        )
        .await;
    assert!(result.is_ok());
    settle().await;

    let pending = harness
        .store
        .state(|s| s.auth.pending_authorization.clone())
        .await;
    let pending = pending.expect("authorization request recorded");
    assert_eq!(pending.provider, OAuthProvider::Google);
    assert!(pending.url.contains("google"));
}

// ============================================================================
// Sign-Out and Expiry
// ============================================================================

/// Sign-out revokes the backend session, then tears down local state and
/// storage.
#[tokio::test]
async fn test_sign_out_revokes_and_clears() {
    let harness = harness();
    sign_in(&harness, "token-1").await;

    let result = harness
        .store
        .send_and_wait_for(
            AppAction::SignOut {
                correlation_id: Uuid::new_v4(),
            },
            |action| matches!(action, AppAction::SignedOut { .. }),
            Duration::from_secs(1),
        )
        .await;
    assert!(result.is_ok());
    settle().await;

    let (session, preferences) = harness
        .store
        .state(|s| (s.auth.session.clone(), s.preferences.preferences.clone()))
        .await;
    assert!(session.is_none());
    assert_eq!(preferences, nicheflow_client::Preferences::default());

    // Backend saw the revocation and local storage was purged.
    assert_eq!(
        harness.identity.signed_out_tokens().unwrap(),
        vec!["token-1".to_string()]
    );
    assert!(harness.storage.is_empty().unwrap());
}

/// When the backend no longer knows the token, sign-out degrades into
/// local expiry instead of failing.
#[tokio::test]
async fn test_sign_out_with_revoked_token_expires_locally() {
    let harness = harness();
    sign_in(&harness, "token-1").await;
    // The backend revoked the session out from under the client.
    harness.identity.fail_with(ClientError::Unauthorized {
        message: "session not found".to_string(),
    });

    let result = harness
        .store
        .send_and_wait_for(
            AppAction::SignOut {
                correlation_id: Uuid::new_v4(),
            },
            |action| matches!(action, AppAction::SessionExpired { .. }),
            Duration::from_secs(1),
        )
        .await;
    assert!(result.is_ok());
    settle().await;

    let session = harness.store.state(|s| s.auth.session.clone()).await;
    assert!(session.is_none());
    assert!(harness.storage.is_empty().unwrap());
}

/// Racing 401s produce one teardown and one notification; later
/// expiries are no-ops.
#[tokio::test]
async fn test_session_expiry_is_idempotent_across_races() {
    let harness = harness();
    sign_in(&harness, "token-1").await;
    harness.preferences.fail_with(ClientError::Unauthorized {
        message: "token revoked".to_string(),
    });

    // Two concurrent fetches both hit the 401.
    for _ in 0..2 {
        let result = harness
            .store
            .send_and_wait_for(
                AppAction::FetchPreferences {
                    correlation_id: Uuid::new_v4(),
                },
                |action| matches!(action, AppAction::SessionExpired { .. }),
                Duration::from_secs(1),
            )
            .await;
        assert!(result.is_ok());
        settle().await;
    }

    let session = harness.store.state(|s| s.auth.session.clone()).await;
    assert!(session.is_none());

    // Only the first expiry notified the user.
    let errors = harness.notifier.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("expired"));
}

/// The injected clock decides expiry: a session valid now reads as
/// unauthenticated once its deadline passes.
#[tokio::test]
async fn test_expired_session_is_not_authenticated() {
    let harness = harness();
    sign_in(&harness, "token-1").await;

    let now = test_clock().now();
    let later = now + TimeDelta::hours(25);

    let (live, expired) = harness
        .store
        .state(|s| (s.auth.is_authenticated(now), s.auth.is_authenticated(later)))
        .await;

    assert!(live);
    assert!(!expired);
}

// ============================================================================
// Email Verification
// ============================================================================

/// A scripted verification token produces the backend's confirmation
/// message as a success notification.
#[tokio::test]
async fn test_verify_email_notifies_with_backend_message() {
    let harness = harness();
    harness
        .identity
        .script_verification("verify-1", "Email verified successfully");

    let result = harness
        .store
        .send_and_wait_for(
            AppAction::VerifyEmail {
                correlation_id: Uuid::new_v4(),
                token: "verify-1".to_string(),
            },
            |action| matches!(action, AppAction::EmailVerified { .. }),
            Duration::from_secs(1),
        )
        .await;
    assert!(result.is_ok());
    settle().await;

    assert_eq!(
        harness.notifier.successes(),
        vec!["Email verified successfully".to_string()]
    );
}

/// An unknown verification token notifies the failure.
#[tokio::test]
async fn test_verify_email_with_unknown_token_fails() {
    let harness = harness();

    let result = harness
        .store
        .send_and_wait_for(
            AppAction::VerifyEmail {
                correlation_id: Uuid::new_v4(),
                token: "bogus".to_string(),
            },
            |action| matches!(action, AppAction::EmailVerificationFailed { .. }),
            Duration::from_secs(1),
        )
        .await;
    assert!(result.is_ok());
    settle().await;

    assert!(harness.notifier.successes().is_empty());
    assert_eq!(harness.notifier.errors().len(), 1);
}
