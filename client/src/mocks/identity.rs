//! Mock identity gateway for testing.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::error::{ClientError, Result};
use crate::mocks::poisoned;
use crate::providers::{CallbackResponse, IdentityGateway};
use crate::state::{OAuthProvider, ProviderDescriptor, UserProfile};

#[derive(Debug, Default)]
struct Inner {
    providers: Vec<ProviderDescriptor>,
    /// Valid tokens and the profiles they resolve to.
    sessions: HashMap<String, UserProfile>,
    /// Scripted authorization code exchanges.
    exchanges: HashMap<String, CallbackResponse>,
    /// Scripted email verifications: token → confirmation message.
    verifications: HashMap<String, String>,
    /// When set, every call fails with this error.
    failure: Option<ClientError>,
    /// Tokens passed to successful sign-out calls.
    signed_out: Vec<String>,
}

/// Mock identity gateway.
///
/// Uses in-memory storage for testing. Tokens registered with
/// [`MockIdentityGateway::grant_session`] validate; everything else is
/// rejected with `Unauthorized`, matching the backend contract.
#[derive(Debug, Clone)]
pub struct MockIdentityGateway {
    inner: Arc<Mutex<Inner>>,
}

impl MockIdentityGateway {
    /// Create a new mock identity gateway with no valid tokens.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Add a provider to the advertised list.
    #[must_use]
    pub fn with_provider(self, descriptor: ProviderDescriptor) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            inner.providers.push(descriptor);
        }
        self
    }

    /// Register a token as valid, resolving to `user`.
    pub fn grant_session(&self, token: &str, user: UserProfile) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.sessions.insert(token.to_string(), user);
        }
    }

    /// Script a code exchange result.
    pub fn script_exchange(&self, code: &str, response: CallbackResponse) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.exchanges.insert(code.to_string(), response);
        }
    }

    /// Script an email verification result.
    pub fn script_verification(&self, token: &str, message: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner
                .verifications
                .insert(token.to_string(), message.to_string());
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

    /// Tokens passed to successful sign-out calls (for testing).
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn signed_out_tokens(&self) -> Result<Vec<String>> {
        Ok(self.inner.lock().map_err(|_| poisoned())?.signed_out.clone())
    }
}

impl Default for MockIdentityGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityGateway for MockIdentityGateway {
    fn providers(
        &self,
    ) -> impl Future<Output = Result<Vec<ProviderDescriptor>>> + Send {
        let inner = Arc::clone(&self.inner);

        async move {
            let guard = inner.lock().map_err(|_| poisoned())?;
            if let Some(error) = &guard.failure {
                return Err(error.clone());
            }
            Ok(guard.providers.clone())
        }
    }

    fn authorization_url(
        &self,
        provider: OAuthProvider,
    ) -> impl Future<Output = Result<String>> + Send {
        let inner = Arc::clone(&self.inner);

        async move {
            let guard = inner.lock().map_err(|_| poisoned())?;
            if let Some(error) = &guard.failure {
                return Err(error.clone());
            }
            Ok(format!("https://auth.example.test/{}", provider.as_str()))
        }
    }

    fn exchange_code(
        &self,
        provider: OAuthProvider,
        code: &str,
    ) -> impl Future<Output = Result<CallbackResponse>> + Send {
        let inner = Arc::clone(&self.inner);
        let code = code.to_string();

        async move {
            let mut guard = inner.lock().map_err(|_| poisoned())?;
            if let Some(error) = &guard.failure {
                return Err(error.clone());
            }

            let response = guard.exchanges.get(&code).cloned().ok_or_else(|| {
                ClientError::Api {
                    code: 400,
                    message: format!("invalid authorization code for {provider}"),
                }
            })?;

            // A consumed exchange token becomes a live session.
            guard
                .sessions
                .insert(response.access_token.clone(), response.user.clone());
            Ok(response)
        }
    }

    fn fetch_session(&self, token: &str) -> impl Future<Output = Result<UserProfile>> + Send {
        let inner = Arc::clone(&self.inner);
        let token = token.to_string();

        async move {
            let guard = inner.lock().map_err(|_| poisoned())?;
            if let Some(error) = &guard.failure {
                return Err(error.clone());
            }

            guard
                .sessions
                .get(&token)
                .cloned()
                .ok_or_else(|| ClientError::Unauthorized {
                    message: "session not found".to_string(),
                })
        }
    }

    fn sign_out(&self, token: &str) -> impl Future<Output = Result<()>> + Send {
        let inner = Arc::clone(&self.inner);
        let token = token.to_string();

        async move {
            let mut guard = inner.lock().map_err(|_| poisoned())?;
            if let Some(error) = &guard.failure {
                return Err(error.clone());
            }

            if guard.sessions.remove(&token).is_none() {
                return Err(ClientError::Unauthorized {
                    message: "session not found".to_string(),
                });
            }

            guard.signed_out.push(token);
            Ok(())
        }
    }

    fn verify_email(&self, token: &str) -> impl Future<Output = Result<String>> + Send {
        let inner = Arc::clone(&self.inner);
        let token = token.to_string();

        async move {
            let guard = inner.lock().map_err(|_| poisoned())?;
            if let Some(error) = &guard.failure {
                return Err(error.clone());
            }

            guard
                .verifications
                .get(&token)
                .cloned()
                .ok_or_else(|| ClientError::Api {
                    code: 400,
                    message: "verification failed".to_string(),
                })
        }
    }
}
