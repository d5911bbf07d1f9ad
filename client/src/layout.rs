//! Layout shell selection.
//!
//! A pure projection from authentication state and the current route to the
//! shell a host should render. Hosts call [`select_shell`] on every
//! navigation and every auth state change; it holds no state of its own.

use chrono::{DateTime, Utc};

use crate::state::AuthState;

/// Routes that always render without chrome, signed in or not.
const AUTH_ROUTES: [&str; 4] = ["/sign-in", "/sign-up", "/login", "/register"];

/// Shell a host should wrap the current route in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shell {
    /// Render nothing; a session restore is still settling.
    Hidden,
    /// No chrome at all, used for the auth pages.
    Bare,
    /// Full product chrome for signed-in users.
    Dashboard,
    /// Public marketing chrome.
    Marketing,
}

/// Selects the shell for `path` given the auth state at `now`.
///
/// Total over all inputs: any string is a valid path and every auth state
/// maps to exactly one shell.
///
/// # Examples
///
/// ```
/// # use nicheflow_client::{select_shell, Shell};
/// # use nicheflow_client::state::AuthState;
/// # use chrono::Utc;
/// let auth = AuthState { loading: false, ..AuthState::default() };
/// assert_eq!(select_shell(&auth, Utc::now(), "/pricing"), Shell::Marketing);
/// assert_eq!(select_shell(&auth, Utc::now(), "/login"), Shell::Bare);
/// ```
#[must_use]
pub fn select_shell(auth: &AuthState, now: DateTime<Utc>, path: &str) -> Shell {
    if auth.loading {
        return Shell::Hidden;
    }

    if is_auth_route(path) {
        return Shell::Bare;
    }

    if auth.is_authenticated(now) {
        Shell::Dashboard
    } else {
        Shell::Marketing
    }
}

/// Returns `true` for routes that belong to the sign-in flow.
fn is_auth_route(path: &str) -> bool {
    // Compare the pathname only; query and fragment never change the shell.
    let path = path.split(['?', '#']).next().unwrap_or(path);

    if path.starts_with("/auth/") {
        return true;
    }

    let trimmed = path.trim_end_matches('/');
    AUTH_ROUTES.contains(&trimmed)
}
