//! User notification trait.

/// Transient user-facing notifications (toasts, banners).
///
/// Effects report outcomes through this trait instead of leaving messages
/// in state, so notifications fire exactly once per event rather than on
/// every re-render.
pub trait Notifier: Send + Sync {
    /// Show a success notification.
    fn success(&self, message: &str);

    /// Show an error notification.
    fn error(&self, message: &str);
}
