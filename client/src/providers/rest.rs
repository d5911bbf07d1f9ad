//! REST gateway adapters.
//!
//! Concrete [`IdentityGateway`] and [`PreferencesGateway`] implementations
//! over the backend's HTTP API. Both wrap a shared [`ApiClient`], so one
//! connection pool serves every gateway.

use serde::Deserialize;

use crate::api::ApiClient;
use crate::error::Result;
use crate::providers::{CallbackResponse, IdentityGateway, PreferencesGateway};
use crate::state::{OAuthProvider, PreferencesPatch, ProviderDescriptor, UserProfile};

/// Payload wrapper of the provider listing endpoint.
#[derive(Debug, Deserialize)]
struct ProvidersData {
    providers: Vec<ProviderDescriptor>,
}

/// Payload wrapper of the authorization URL endpoint.
#[derive(Debug, Deserialize)]
struct UrlData {
    url: String,
}

/// Payload wrapper of the session endpoint.
#[derive(Debug, Deserialize)]
struct SessionData {
    user: UserProfile,
}

/// Payload wrapper of message-only endpoints.
#[derive(Debug, Deserialize)]
struct MessageData {
    message: String,
}

/// Identity gateway backed by the REST API.
#[derive(Debug, Clone)]
pub struct RestIdentityGateway {
    api: ApiClient,
}

impl RestIdentityGateway {
    /// Creates a gateway over an existing API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl IdentityGateway for RestIdentityGateway {
    fn providers(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<ProviderDescriptor>>> + Send {
        let api = self.api.clone();
        async move {
            let data: ProvidersData = api.get("/auth/providers", None).await?;
            Ok(data.providers)
        }
    }

    fn authorization_url(
        &self,
        provider: OAuthProvider,
    ) -> impl std::future::Future<Output = Result<String>> + Send {
        let api = self.api.clone();
        async move {
            let path = format!("/auth/url/{}", provider.as_str());
            let data: UrlData = api.get(&path, None).await?;
            Ok(data.url)
        }
    }

    fn exchange_code(
        &self,
        provider: OAuthProvider,
        code: &str,
    ) -> impl std::future::Future<Output = Result<CallbackResponse>> + Send {
        let api = self.api.clone();
        let code = code.to_string();
        async move {
            let path = format!("/auth/callback/{}", provider.as_str());
            api.get_with_query(&path, &[("code", code.as_str())], None)
                .await
        }
    }

    fn fetch_session(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<UserProfile>> + Send {
        let api = self.api.clone();
        let token = token.to_string();
        async move {
            let data: SessionData = api.get("/auth/session", Some(&token)).await?;
            Ok(data.user)
        }
    }

    fn sign_out(&self, token: &str) -> impl std::future::Future<Output = Result<()>> + Send {
        let api = self.api.clone();
        let token = token.to_string();
        async move { api.post_unit("/auth/signout", Some(&token)).await }
    }

    fn verify_email(&self, token: &str) -> impl std::future::Future<Output = Result<String>> + Send {
        let api = self.api.clone();
        let token = token.to_string();
        async move {
            let data: MessageData = api
                .get_with_query("/auth/verify-email", &[("token", token.as_str())], None)
                .await?;
            Ok(data.message)
        }
    }
}

/// Preferences gateway backed by the REST API.
#[derive(Debug, Clone)]
pub struct RestPreferencesGateway {
    api: ApiClient,
}

impl RestPreferencesGateway {
    /// Creates a gateway over an existing API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

impl PreferencesGateway for RestPreferencesGateway {
    fn fetch(
        &self,
        bearer: Option<&str>,
    ) -> impl std::future::Future<Output = Result<PreferencesPatch>> + Send {
        let api = self.api.clone();
        let bearer = bearer.map(str::to_string);
        async move { api.get("/v1/user/preferences", bearer.as_deref()).await }
    }

    fn update(
        &self,
        bearer: Option<&str>,
        patch: &PreferencesPatch,
    ) -> impl std::future::Future<Output = Result<()>> + Send {
        let api = self.api.clone();
        let bearer = bearer.map(str::to_string);
        let patch = patch.clone();
        async move {
            api.put_unit("/v1/user/preferences", bearer.as_deref(), &patch)
                .await
        }
    }
}
