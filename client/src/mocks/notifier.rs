//! Recording notifier for testing.

use std::sync::{Arc, Mutex};

use crate::providers::Notifier;

#[derive(Debug, Default)]
struct Inner {
    successes: Vec<String>,
    errors: Vec<String>,
}

/// Notifier that records every message instead of showing it.
#[derive(Debug, Clone)]
pub struct RecordingNotifier {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingNotifier {
    /// Create a notifier with no recorded messages.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Success messages shown so far, oldest first (for testing).
    #[must_use]
    pub fn successes(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|inner| inner.successes.clone())
            .unwrap_or_default()
    }

    /// Error messages shown so far, oldest first (for testing).
    #[must_use]
    pub fn errors(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|inner| inner.errors.clone())
            .unwrap_or_default()
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.successes.push(message.to_string());
        }
    }

    fn error(&self, message: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.errors.push(message.to_string());
        }
    }
}
