//! Session flow demo binary
//!
//! Walks the NicheFlow client through a full user journey against mock
//! gateways: boot, provider discovery, sign-in, preference changes, and
//! sign-out, printing the state and layout shell after each step.

use std::time::Duration;

use chrono::Duration as TimeDelta;
use nicheflow_client::mocks::{
    MemoryStorage, MockIdentityGateway, MockPlatform, MockPreferencesGateway, RecordingNotifier,
};
use nicheflow_client::providers::{CallbackResponse, SessionDescriptor};
use nicheflow_client::state::ProviderDescriptor;
use nicheflow_client::{
    AppAction, AppReducer, AppState, ClientConfig, ClientEnvironment, Locale, OAuthProvider,
    PreferencesPatch, UserId, UserProfile, select_shell,
};
use nicheflow_core::environment::Clock;
use nicheflow_runtime::Store;
use nicheflow_testing::test_clock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

const WAIT: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "session_flow=debug,nicheflow_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== NicheFlow Client: Session Flow ===\n");

    let clock = test_clock();
    let now = clock.now();

    // Script the backend: two providers, one valid authorization code,
    // and a server-side dark theme preference.
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
    identity.script_exchange(
        "demo-code",
        CallbackResponse {
            session: SessionDescriptor {
                id: "sess-1".to_string(),
                user_id: 7,
                expires_at: now + TimeDelta::hours(24),
            },
            user: UserProfile {
                id: UserId(7),
                email: "ada@example.com".to_string(),
                username: "ada".to_string(),
                ..UserProfile::default()
            },
            access_token: "demo-token".to_string(),
        },
    );

    let preferences = MockPreferencesGateway::new().with_remote(PreferencesPatch {
        theme: Some(nicheflow_client::ThemeMode::Dark),
        ..PreferencesPatch::default()
    });

    let platform = MockPlatform::new().with_system_locales(vec!["zh-CN".to_string()]);
    let storage = MemoryStorage::new();
    let notifier = RecordingNotifier::new();

    let env = ClientEnvironment::new(
        identity,
        preferences,
        storage.clone(),
        platform,
        notifier.clone(),
        clock,
        ClientConfig::new(),
    );

    let store = Store::new(AppState::default(), AppReducer::new(), env);

    // Boot: no stored token, locale resolved from the platform
    println!(">>> Sending: Bootstrap");
    let result = store
        .send_and_wait_for(
            AppAction::Bootstrap {
                correlation_id: Uuid::new_v4(),
            },
            |action| matches!(action, AppAction::SessionUnavailable { .. }),
            WAIT,
        )
        .await;
    if result.is_err() {
        eprintln!("bootstrap did not settle: {result:?}");
        return;
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    let (language, shell) = store
        .state(|s| {
            (
                s.preferences.preferences.language,
                select_shell(&s.auth, now, "/"),
            )
        })
        .await;
    println!("Signed out. Locale from platform: {language}, shell at \"/\": {shell:?}");

    // Discover providers
    println!("\n>>> Sending: LoadProviders");
    let _ = store
        .send_and_wait_for(
            AppAction::LoadProviders {
                correlation_id: Uuid::new_v4(),
            },
            |action| matches!(action, AppAction::ProvidersLoaded { .. }),
            WAIT,
        )
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let names = store
        .state(|s| {
            s.auth
                .providers
                .iter()
                .map(|p| p.name.clone())
                .collect::<Vec<_>>()
        })
        .await;
    println!("Available providers: {}", names.join(", "));

    // Request the authorization URL
    println!("\n>>> Sending: InitiateSignIn (google)");
    let _ = store
        .send_and_wait_for(
            AppAction::InitiateSignIn {
                correlation_id: Uuid::new_v4(),
                provider: OAuthProvider::Google,
            },
            |action| matches!(action, AppAction::AuthorizationUrlReady { .. }),
            WAIT,
        )
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    if let Some(request) = store.state(|s| s.auth.pending_authorization.clone()).await {
        println!("Redirect the user to: {}", request.url);
    }

    // Complete the sign-in with the callback code
    println!("\n>>> Sending: CompleteSignIn (code = demo-code)");
    let _ = store
        .send_and_wait_for(
            AppAction::CompleteSignIn {
                correlation_id: Uuid::new_v4(),
                provider: OAuthProvider::Google,
                code: "demo-code".to_string(),
            },
            |action| matches!(action, AppAction::PreferencesFetched { .. }),
            WAIT,
        )
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let (email, theme, shell) = store
        .state(|s| {
            (
                s.auth.session.as_ref().map(|sess| sess.user.email.clone()),
                s.preferences.preferences.theme,
                select_shell(&s.auth, now, "/dashboard"),
            )
        })
        .await;
    tracing::info!(email = ?email, "signed in");
    println!(
        "Signed in as {}. Server theme: {theme:?}, shell at \"/dashboard\": {shell:?}",
        email.unwrap_or_default()
    );

    // Change the locale; signed in, this routes through the backend
    println!("\n>>> Sending: SetLocale (en)");
    let _ = store
        .send_and_wait_for(
            AppAction::SetLocale {
                correlation_id: Uuid::new_v4(),
                locale: Locale::En,
            },
            |action| matches!(action, AppAction::PreferencesUpdated { .. }),
            WAIT,
        )
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let language = store.state(|s| s.preferences.preferences.language).await;
    println!("Locale confirmed by backend: {language}");

    // Sign out: backend revoke, then local teardown
    println!("\n>>> Sending: SignOut");
    let _ = store
        .send_and_wait_for(
            AppAction::SignOut {
                correlation_id: Uuid::new_v4(),
            },
            |action| matches!(action, AppAction::SignedOut { .. }),
            WAIT,
        )
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let shell = store.state(|s| select_shell(&s.auth, now, "/")).await;
    println!("Signed out. Shell at \"/\": {shell:?}");

    let toasts = notifier.successes();
    if !toasts.is_empty() {
        println!("\nNotifications shown along the way:");
        for toast in toasts {
            println!("  • {toast}");
        }
    }

    println!("\n=== Session Flow Complete ===");
    println!("\nKey concepts demonstrated:");
    println!("  • State: AppState (auth + preferences slices)");
    println!("  • Action: AppAction (commands in, events back from effects)");
    println!("  • Reducer: AppReducer routing to session and preferences logic");
    println!("  • Store: Runtime driving the effect feedback loop");
    println!("  • Environment: Gateways, storage, platform, notifier, clock");
    println!("  • Projection: select_shell maps auth state to a layout shell");
}
