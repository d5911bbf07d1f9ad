//! Mock preferences gateway for testing.

use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::error::{ClientError, Result};
use crate::mocks::poisoned;
use crate::providers::PreferencesGateway;
use crate::state::PreferencesPatch;

#[derive(Debug, Default)]
struct Inner {
    /// Server copy, expressed as the patch a fetch returns.
    remote: PreferencesPatch,
    /// When set, every call fails with this error.
    failure: Option<ClientError>,
    /// Patches accepted by successful update calls.
    updates: Vec<PreferencesPatch>,
}

/// Mock preferences gateway.
///
/// Holds a scriptable server copy. Fetches return it verbatim; updates are
/// recorded and folded into it, so a later fetch sees earlier writes.
#[derive(Debug, Clone)]
pub struct MockPreferencesGateway {
    inner: Arc<Mutex<Inner>>,
}

impl MockPreferencesGateway {
    /// Create a mock gateway whose server copy is empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Seed the server copy.
    #[must_use]
    pub fn with_remote(self, remote: PreferencesPatch) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.remote = remote;
        }
        self
    }

    /// Replace the server copy.
    pub fn set_remote(&self, remote: PreferencesPatch) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.remote = remote;
        }
    }

    /// Force every subsequent call to fail with `error`.
    pub fn fail_with(&self, error: ClientError) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.failure = Some(error);
        }
    }

    /// Stop forcing failures.
    pub fn clear_failure(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.failure = None;
        }
    }

    /// Patches accepted by successful update calls (for testing).
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn recorded_updates(&self) -> Result<Vec<PreferencesPatch>> {
        Ok(self.inner.lock().map_err(|_| poisoned())?.updates.clone())
    }
}

impl Default for MockPreferencesGateway {
    fn default() -> Self {
        Self::new()
    }
}

/// Folds `from` into `into`, field by field.
fn merge(into: &mut PreferencesPatch, from: &PreferencesPatch) {
    if from.language.is_some() {
        into.language = from.language;
    }
    if from.theme.is_some() {
        into.theme = from.theme;
    }
    if from.time_zone.is_some() {
        into.time_zone = from.time_zone.clone();
    }
    if from.date_format.is_some() {
        into.date_format = from.date_format.clone();
    }
    if from.time_format.is_some() {
        into.time_format = from.time_format.clone();
    }
    if from.notification_email.is_some() {
        into.notification_email = from.notification_email;
    }
    if from.notification_mobile.is_some() {
        into.notification_mobile = from.notification_mobile;
    }
    if from.notification_web.is_some() {
        into.notification_web = from.notification_web;
    }
}

impl PreferencesGateway for MockPreferencesGateway {
    fn fetch(
        &self,
        _bearer: Option<&str>,
    ) -> impl Future<Output = Result<PreferencesPatch>> + Send {
        let inner = Arc::clone(&self.inner);

        async move {
            let guard = inner.lock().map_err(|_| poisoned())?;
            if let Some(error) = &guard.failure {
                return Err(error.clone());
            }
            Ok(guard.remote.clone())
        }
    }

    fn update(
        &self,
        _bearer: Option<&str>,
        patch: &PreferencesPatch,
    ) -> impl Future<Output = Result<()>> + Send {
        let inner = Arc::clone(&self.inner);
        let patch = patch.clone();

        async move {
            let mut guard = inner.lock().map_err(|_| poisoned())?;
            if let Some(error) = &guard.failure {
                return Err(error.clone());
            }

            let mut remote = guard.remote.clone();
            merge(&mut remote, &patch);
            guard.remote = remote;
            guard.updates.push(patch);
            Ok(())
        }
    }
}
