//! Client state types.
//!
//! This module defines the state tree managed by the client reducers:
//! authentication state, the authoritative preferences entity, and the
//! projection types derived from it. All types are `Clone` to support the
//! functional architecture pattern.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::session;
use crate::error::ClientError;

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for a user.
///
/// Serializes as the bare number the backend uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

// ═══════════════════════════════════════════════════════════════════════
// Identity Types
// ═══════════════════════════════════════════════════════════════════════

/// OAuth provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    /// Google OAuth.
    Google,
    /// GitHub OAuth.
    GitHub,
}

impl OAuthProvider {
    /// Get the provider identifier as used in API paths.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::GitHub => "github",
        }
    }

    /// Parse a provider from its wire identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::UnsupportedProvider`] if the identifier is
    /// not one the client understands.
    pub fn from_str(s: &str) -> Result<Self, ClientError> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "github" => Ok(Self::GitHub),
            _ => Err(ClientError::UnsupportedProvider(s.to_string())),
        }
    }
}

impl std::fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Descriptor for a sign-in provider offered by the backend.
///
/// Returned by the provider listing endpoint and held in [`AuthState`] so
/// hosts can render the available sign-in buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Provider identifier (e.g. "google").
    pub id: String,

    /// Human-readable provider name (e.g. "Google").
    pub name: String,

    /// Provider mechanism, currently always "oauth".
    #[serde(rename = "type")]
    pub kind: String,

    /// OAuth scopes requested from this provider.
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// Profile of the signed-in user as reported by the backend.
///
/// Fields mirror the backend user resource. Unknown fields in the payload
/// are ignored; fields the backend may omit carry defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Unique user identifier.
    pub id: UserId,

    /// Primary email address.
    pub email: String,

    /// Display username.
    #[serde(default)]
    pub username: String,

    /// Given name.
    #[serde(default)]
    pub first_name: String,

    /// Family name.
    #[serde(default)]
    pub last_name: String,

    /// Avatar URL.
    #[serde(default)]
    pub image_url: String,

    /// Whether the email address has been verified.
    #[serde(default)]
    pub email_verified: bool,

    /// Role within the product.
    #[serde(default = "default_role")]
    pub role: String,

    /// Account status.
    #[serde(default = "default_status")]
    pub status: String,

    /// Current subscription status, if any.
    #[serde(default)]
    pub subscription_status: String,

    /// Total operations consumed.
    #[serde(default)]
    pub usage_count: i64,

    /// Total operations allowed.
    #[serde(default)]
    pub usage_limit: i64,

    /// Operations consumed this month.
    #[serde(default)]
    pub monthly_count: i64,

    /// Operations allowed per month.
    #[serde(default)]
    pub monthly_limit: i64,
}

fn default_role() -> String {
    "user".to_string()
}

fn default_status() -> String {
    "active".to_string()
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            id: UserId::default(),
            email: String::new(),
            username: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            image_url: String::new(),
            email_verified: false,
            role: default_role(),
            status: default_status(),
            subscription_status: String::new(),
            usage_count: 0,
            usage_limit: 0,
            monthly_count: 0,
            monthly_limit: 0,
        }
    }
}

/// Authenticated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Profile of the session's user.
    pub user: UserProfile,

    /// Bearer token presented on authenticated requests.
    pub access_token: String,

    /// Session expiration timestamp.
    pub expires_at: DateTime<Utc>,

    /// Provider the session was established through, when known.
    pub provider: Option<OAuthProvider>,
}

impl Session {
    /// Creates a session expiring after the default lifetime.
    #[must_use]
    pub fn new(user: UserProfile, access_token: String, now: DateTime<Utc>) -> Self {
        Self {
            user,
            access_token,
            expires_at: now + Duration::hours(session::DEFAULT_TTL_HOURS),
            provider: None,
        }
    }

    /// Returns `true` if the session has expired as of `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-flight authorization request recorded while the host redirects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRequest {
    /// Provider the user chose.
    pub provider: OAuthProvider,

    /// Authorization URL the host should navigate to.
    pub url: String,
}

/// Authentication slice of the client state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    /// Current session, if signed in.
    pub session: Option<Session>,

    /// Whether a session restore or sign-in is in flight.
    ///
    /// Starts `true` so hosts render nothing auth-dependent until the
    /// first restore settles.
    pub loading: bool,

    /// Sign-in providers advertised by the backend.
    pub providers: Vec<ProviderDescriptor>,

    /// Authorization request awaiting the provider redirect.
    pub pending_authorization: Option<AuthorizationRequest>,
}

impl AuthState {
    /// Returns `true` if a session exists and has not expired as of `now`.
    #[must_use]
    pub fn is_authenticated(&self, now: DateTime<Utc>) -> bool {
        self.session.as_ref().is_some_and(|s| !s.is_expired(now))
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            session: None,
            loading: true,
            providers: Vec::new(),
            pending_authorization: None,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Preference Types
// ═══════════════════════════════════════════════════════════════════════

/// Supported UI languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Simplified Chinese.
    #[default]
    Zh,
    /// English.
    En,
}

impl Locale {
    /// Get the locale identifier as stored in preferences and cookies.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Zh => "zh",
            Self::En => "en",
        }
    }

    /// Human-readable name shown in language pickers.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Zh => "简体中文",
            Self::En => "English",
        }
    }

    /// Parse a locale identifier, returning `None` for anything unknown.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "zh" => Some(Self::Zh),
            "en" => Some(Self::En),
            _ => None,
        }
    }

    /// Resolve the locale to use before any stored preference exists.
    ///
    /// A valid language cookie wins. Otherwise the system locales are
    /// scanned in order and any Chinese locale selects [`Locale::Zh`].
    /// Everything else falls back to [`Locale::En`].
    #[must_use]
    pub fn resolve_preferred(cookie: Option<&str>, system_locales: &[String]) -> Self {
        if let Some(value) = cookie {
            if let Some(locale) = Self::parse(value) {
                return locale;
            }
        }

        for lang in system_locales {
            if lang.to_lowercase().starts_with("zh") {
                return Self::Zh;
            }
        }

        Self::En
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Theme preference as stored in the preferences entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Always light.
    #[default]
    Light,
    /// Always dark.
    Dark,
    /// Follow the platform's current appearance.
    System,
}

impl ThemeMode {
    /// Resolve the mode against the platform appearance sampled at call time.
    #[must_use]
    pub const fn resolve(&self, system: ResolvedTheme) -> ResolvedTheme {
        match self {
            Self::Light => ResolvedTheme::Light,
            Self::Dark => ResolvedTheme::Dark,
            Self::System => system,
        }
    }
}

/// Concrete appearance after resolving [`ThemeMode::System`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedTheme {
    /// Light appearance.
    Light,
    /// Dark appearance.
    Dark,
}

/// Authoritative user preferences entity.
///
/// This is the single source of truth locale and theme are projected from;
/// the projections themselves never feed back into this entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// UI language.
    pub language: Locale,

    /// Theme preference.
    pub theme: ThemeMode,

    /// IANA time zone name.
    pub time_zone: String,

    /// Date format pattern.
    pub date_format: String,

    /// Time format pattern.
    pub time_format: String,

    /// Whether email notifications are enabled.
    pub notification_email: bool,

    /// Whether mobile push notifications are enabled.
    pub notification_mobile: bool,

    /// Whether in-app web notifications are enabled.
    pub notification_web: bool,
}

impl Preferences {
    /// Applies a patch, replacing only the fields the patch carries.
    pub fn apply(&mut self, patch: &PreferencesPatch) {
        if let Some(language) = patch.language {
            self.language = language;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(ref time_zone) = patch.time_zone {
            self.time_zone = time_zone.clone();
        }
        if let Some(ref date_format) = patch.date_format {
            self.date_format = date_format.clone();
        }
        if let Some(ref time_format) = patch.time_format {
            self.time_format = time_format.clone();
        }
        if let Some(notification_email) = patch.notification_email {
            self.notification_email = notification_email;
        }
        if let Some(notification_mobile) = patch.notification_mobile {
            self.notification_mobile = notification_mobile;
        }
        if let Some(notification_web) = patch.notification_web {
            self.notification_web = notification_web;
        }
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: Locale::Zh,
            theme: ThemeMode::Light,
            time_zone: "Asia/Shanghai".to_string(),
            date_format: "YYYY-MM-DD".to_string(),
            time_format: "HH:mm".to_string(),
            notification_email: true,
            notification_mobile: true,
            notification_web: true,
        }
    }
}

/// Partial update to the preferences entity.
///
/// Serializes with absent fields omitted, so a patch is also the PUT body
/// sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreferencesPatch {
    /// New UI language, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Locale>,

    /// New theme preference, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeMode>,

    /// New time zone, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,

    /// New date format, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,

    /// New time format, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,

    /// New email notification setting, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_email: Option<bool>,

    /// New mobile notification setting, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_mobile: Option<bool>,

    /// New web notification setting, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_web: Option<bool>,
}

impl PreferencesPatch {
    /// Patch changing only the language.
    #[must_use]
    pub fn language(locale: Locale) -> Self {
        Self {
            language: Some(locale),
            ..Self::default()
        }
    }

    /// Patch changing only the theme.
    #[must_use]
    pub fn theme(mode: ThemeMode) -> Self {
        Self {
            theme: Some(mode),
            ..Self::default()
        }
    }

    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.language.is_none()
            && self.theme.is_none()
            && self.time_zone.is_none()
            && self.date_format.is_none()
            && self.time_format.is_none()
            && self.notification_email.is_none()
            && self.notification_mobile.is_none()
            && self.notification_web.is_none()
    }
}

/// Preferences slice of the client state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreferencesState {
    /// Authoritative preferences entity.
    pub preferences: Preferences,

    /// Whether a fetch or update is in flight.
    pub loading: bool,

    /// Message from the most recent failed fetch or update.
    pub error: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// Root State
// ═══════════════════════════════════════════════════════════════════════

/// Root client state.
///
/// # Examples
///
/// ```
/// # use nicheflow_client::AppState;
/// let state = AppState::default();
/// assert!(state.auth.session.is_none());
/// assert!(state.auth.loading);
/// assert!(!state.preferences.loading);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppState {
    /// Authentication slice.
    pub auth: AuthState,

    /// Preferences slice.
    pub preferences: PreferencesState,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::TimeZone;

    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn test_user() -> UserProfile {
        UserProfile {
            id: UserId(7),
            email: "ada@example.com".to_string(),
            username: "ada".to_string(),
            ..UserProfile::default()
        }
    }

    #[test]
    fn test_provider_wire_identifiers() {
        assert_eq!(OAuthProvider::Google.as_str(), "google");
        assert_eq!(OAuthProvider::GitHub.as_str(), "github");
        assert_eq!(
            serde_json::to_string(&OAuthProvider::GitHub).unwrap(),
            "\"github\""
        );
        assert_eq!(
            OAuthProvider::from_str("GOOGLE").unwrap(),
            OAuthProvider::Google
        );
        assert!(matches!(
            OAuthProvider::from_str("gitlab"),
            Err(ClientError::UnsupportedProvider(_))
        ));
    }

    #[test]
    fn test_user_id_is_transparent() {
        let id: UserId = serde_json::from_str("42").unwrap();
        assert_eq!(id, UserId(42));
        assert_eq!(serde_json::to_string(&UserId(42)).unwrap(), "42");
    }

    #[test]
    fn test_user_profile_defaults_for_omitted_fields() {
        let user: UserProfile =
            serde_json::from_str(r#"{"id": 1, "email": "ada@example.com"}"#).unwrap();
        assert_eq!(user.role, "user");
        assert_eq!(user.status, "active");
        assert!(!user.email_verified);
        assert_eq!(user.usage_count, 0);
    }

    #[test]
    fn test_session_expiry() {
        let now = test_now();
        let session = Session::new(test_user(), "token".to_string(), now);
        assert_eq!(session.expires_at, now + Duration::hours(24));
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + Duration::hours(25)));
    }

    #[test]
    fn test_is_authenticated_requires_live_session() {
        let now = test_now();
        let mut state = AuthState::default();
        assert!(!state.is_authenticated(now));

        state.session = Some(Session::new(test_user(), "token".to_string(), now));
        assert!(state.is_authenticated(now));

        // Session still present but past its expiry.
        assert!(!state.is_authenticated(now + Duration::hours(25)));
    }

    #[test]
    fn test_auth_state_starts_loading() {
        assert!(AuthState::default().loading);
    }

    #[test]
    fn test_locale_resolution_prefers_cookie() {
        let locales = vec!["en-US".to_string()];
        assert_eq!(
            Locale::resolve_preferred(Some("zh"), &locales),
            Locale::Zh
        );
    }

    #[test]
    fn test_locale_resolution_ignores_invalid_cookie() {
        let locales = vec!["fr-FR".to_string(), "zh-CN".to_string()];
        assert_eq!(
            Locale::resolve_preferred(Some("klingon"), &locales),
            Locale::Zh
        );
    }

    #[test]
    fn test_locale_resolution_falls_back_to_english() {
        let locales = vec!["fr-FR".to_string(), "de-DE".to_string()];
        assert_eq!(Locale::resolve_preferred(None, &locales), Locale::En);
        assert_eq!(Locale::resolve_preferred(None, &[]), Locale::En);
    }

    #[test]
    fn test_theme_resolution_samples_system() {
        assert_eq!(
            ThemeMode::System.resolve(ResolvedTheme::Dark),
            ResolvedTheme::Dark
        );
        assert_eq!(
            ThemeMode::System.resolve(ResolvedTheme::Light),
            ResolvedTheme::Light
        );
        assert_eq!(
            ThemeMode::Dark.resolve(ResolvedTheme::Light),
            ResolvedTheme::Dark
        );
        assert_eq!(
            ThemeMode::Light.resolve(ResolvedTheme::Dark),
            ResolvedTheme::Light
        );
    }

    #[test]
    fn test_preferences_defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.language, Locale::Zh);
        assert_eq!(prefs.theme, ThemeMode::Light);
        assert_eq!(prefs.time_zone, "Asia/Shanghai");
        assert_eq!(prefs.date_format, "YYYY-MM-DD");
        assert_eq!(prefs.time_format, "HH:mm");
        assert!(prefs.notification_email);
        assert!(prefs.notification_mobile);
        assert!(prefs.notification_web);
    }

    #[test]
    fn test_patch_apply_is_shallow_merge() {
        let mut prefs = Preferences::default();
        let patch = PreferencesPatch {
            theme: Some(ThemeMode::Dark),
            notification_web: Some(false),
            ..PreferencesPatch::default()
        };

        prefs.apply(&patch);

        assert_eq!(prefs.theme, ThemeMode::Dark);
        assert!(!prefs.notification_web);
        // Untouched fields keep their values.
        assert_eq!(prefs.language, Locale::Zh);
        assert_eq!(prefs.time_zone, "Asia/Shanghai");
        assert!(prefs.notification_email);
    }

    #[test]
    fn test_patch_emptiness() {
        assert!(PreferencesPatch::default().is_empty());
        assert!(!PreferencesPatch::theme(ThemeMode::Dark).is_empty());
        assert!(!PreferencesPatch::language(Locale::En).is_empty());
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = PreferencesPatch::theme(ThemeMode::Dark);
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"theme": "dark"}));
    }

    #[test]
    fn test_patch_deserializes_partial_payload() {
        let patch: PreferencesPatch = serde_json::from_str(r#"{"theme": "dark"}"#).unwrap();
        assert_eq!(patch.theme, Some(ThemeMode::Dark));
        assert!(patch.language.is_none());
        assert!(patch.time_zone.is_none());
    }
}
