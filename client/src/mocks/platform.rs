//! Mock platform adapter for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::providers::Platform;
use crate::state::{Locale, ResolvedTheme};

/// One recorded cookie write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieWrite {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Requested lifetime in days.
    pub max_age_days: i64,
}

#[derive(Debug)]
struct Inner {
    system_theme: ResolvedTheme,
    system_locales: Vec<String>,
    cookies: HashMap<String, String>,
    cookie_writes: Vec<CookieWrite>,
    applied_themes: Vec<ResolvedTheme>,
    applied_languages: Vec<Locale>,
}

/// Mock platform adapter.
///
/// Records every projection so tests can assert what reached the host, and
/// lets tests steer the system appearance and locales.
#[derive(Debug, Clone)]
pub struct MockPlatform {
    inner: Arc<Mutex<Inner>>,
}

impl MockPlatform {
    /// Create a platform with a light system theme and English locales.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                system_theme: ResolvedTheme::Light,
                system_locales: vec!["en-US".to_string()],
                cookies: HashMap::new(),
                cookie_writes: Vec::new(),
                applied_themes: Vec::new(),
                applied_languages: Vec::new(),
            })),
        }
    }

    /// Set the system appearance, builder style.
    #[must_use]
    pub fn with_system_theme(self, theme: ResolvedTheme) -> Self {
        self.set_system_theme(theme);
        self
    }

    /// Set the preferred locales, builder style.
    #[must_use]
    pub fn with_system_locales(self, locales: Vec<String>) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.system_locales = locales;
        }
        self
    }

    /// Seed a cookie, builder style.
    #[must_use]
    pub fn with_cookie(self, name: &str, value: &str) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.cookies.insert(name.to_string(), value.to_string());
        }
        self
    }

    /// Change the system appearance mid-test.
    pub fn set_system_theme(&self, theme: ResolvedTheme) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.system_theme = theme;
        }
    }

    /// Themes applied so far, oldest first (for testing).
    #[must_use]
    pub fn applied_themes(&self) -> Vec<ResolvedTheme> {
        self.inner
            .lock()
            .map(|inner| inner.applied_themes.clone())
            .unwrap_or_default()
    }

    /// Languages applied so far, oldest first (for testing).
    #[must_use]
    pub fn applied_languages(&self) -> Vec<Locale> {
        self.inner
            .lock()
            .map(|inner| inner.applied_languages.clone())
            .unwrap_or_default()
    }

    /// Cookie writes so far, oldest first (for testing).
    #[must_use]
    pub fn cookie_writes(&self) -> Vec<CookieWrite> {
        self.inner
            .lock()
            .map(|inner| inner.cookie_writes.clone())
            .unwrap_or_default()
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for MockPlatform {
    fn apply_theme(&self, theme: ResolvedTheme) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.applied_themes.push(theme);
        }
    }

    fn apply_language(&self, locale: Locale) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.applied_languages.push(locale);
        }
    }

    fn set_cookie(&self, name: &str, value: &str, max_age_days: i64) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.cookies.insert(name.to_string(), value.to_string());
            inner.cookie_writes.push(CookieWrite {
                name: name.to_string(),
                value: value.to_string(),
                max_age_days,
            });
        }
    }

    fn cookie(&self, name: &str) -> Option<String> {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.cookies.get(name).cloned())
    }

    fn system_theme(&self) -> ResolvedTheme {
        self.inner
            .lock()
            .map(|inner| inner.system_theme)
            .unwrap_or(ResolvedTheme::Light)
    }

    fn system_locales(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|inner| inner.system_locales.clone())
            .unwrap_or_default()
    }
}
