//! Platform adapter trait.

use crate::state::{Locale, ResolvedTheme};

/// Surface the client projects presentation state onto.
///
/// Theme and language are owned by the preferences entity; this trait is
/// the one-way sink they are projected into. A browser host flips CSS
/// classes and the document language here, a desktop host retints its
/// windows. Nothing read from this trait ever feeds back into state except
/// through the documented resolution points ([`Platform::cookie`],
/// [`Platform::system_theme`], [`Platform::system_locales`]).
pub trait Platform: Send + Sync {
    /// Apply a resolved theme to the UI.
    fn apply_theme(&self, theme: ResolvedTheme);

    /// Apply a language to the UI (document language, `dir`, fonts).
    fn apply_language(&self, locale: Locale);

    /// Write a cookie with the given lifetime in days.
    fn set_cookie(&self, name: &str, value: &str, max_age_days: i64);

    /// Read a cookie value.
    fn cookie(&self, name: &str) -> Option<String>;

    /// Current system appearance, sampled at call time.
    fn system_theme(&self) -> ResolvedTheme;

    /// Preferred locales of the host environment, most preferred first.
    fn system_locales(&self) -> Vec<String>;
}
