//! HTTP transport for the backend API.
//!
//! Every backend response arrives wrapped in the same envelope:
//!
//! ```json
//! { "code": 200, "message": "success", "data": { ... }, "error": "..." }
//! ```
//!
//! [`ApiClient`] owns the single `reqwest` client, attaches bearer tokens,
//! and interprets envelopes into [`ClientError`] values. Policy decisions
//! (what a 401 means for the session) live in the reducers, not here.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::constants::envelope;
use crate::error::{ClientError, Result};

/// Response envelope shared by every backend endpoint.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct Envelope<T> {
    /// Application-level status code; 200 marks success.
    pub(crate) code: i64,

    /// Human-readable message accompanying the code.
    #[serde(default)]
    pub(crate) message: String,

    /// Payload, omitted by endpoints that have nothing to return.
    pub(crate) data: Option<T>,

    /// Detailed error string on failures.
    #[serde(default)]
    pub(crate) error: Option<String>,
}

impl<T> Envelope<T> {
    /// Best message for a failed envelope: `message`, then `error`, then a
    /// generic fallback.
    pub(crate) fn failure_message(&self) -> String {
        if !self.message.is_empty() {
            return self.message.clone();
        }
        match &self.error {
            Some(error) if !error.is_empty() => error.clone(),
            _ => "request failed".to_string(),
        }
    }
}

/// HTTP client for the backend API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Shared HTTP client carrying the configured timeout.
    http: reqwest::Client,

    /// Base URL without a trailing slash.
    base_url: String,
}

impl ApiClient {
    /// Creates a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.api_timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GET a payload-carrying endpoint.
    ///
    /// # Errors
    ///
    /// Returns a transport, envelope, or decode error; [`ClientError::Decode`]
    /// also covers a success envelope that arrived without `data`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, bearer: Option<&str>) -> Result<T> {
        let request = self.request(reqwest::Method::GET, path, bearer);
        Self::expect_data(self.execute(request).await?)
    }

    /// GET a payload-carrying endpoint with query parameters.
    ///
    /// Query values are percent-encoded by the HTTP layer.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ApiClient::get`].
    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        bearer: Option<&str>,
    ) -> Result<T> {
        let request = self.request(reqwest::Method::GET, path, bearer).query(query);
        Self::expect_data(self.execute(request).await?)
    }

    /// POST to an endpoint whose payload the caller does not need.
    ///
    /// # Errors
    ///
    /// Returns a transport or envelope error; a success envelope without
    /// `data` is fine here.
    pub async fn post_unit(&self, path: &str, bearer: Option<&str>) -> Result<()> {
        let request = self.request(reqwest::Method::POST, path, bearer);
        self.execute::<serde_json::Value>(request).await.map(|_| ())
    }

    /// PUT a JSON body to an endpoint whose payload the caller does not need.
    ///
    /// # Errors
    ///
    /// Returns a transport or envelope error; a success envelope without
    /// `data` is fine here.
    pub async fn put_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        bearer: Option<&str>,
        body: &B,
    ) -> Result<()> {
        let request = self.request(reqwest::Method::PUT, path, bearer).json(body);
        self.execute::<serde_json::Value>(request).await.map(|_| ())
    }

    /// Builds a request with the bearer token attached when present.
    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        bearer: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let mut request = self.http.request(method, self.url(path));
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        request
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends the request and interprets the envelope.
    ///
    /// HTTP 401 short-circuits into [`ClientError::Unauthorized`] before any
    /// envelope interpretation; everything else is judged by the envelope
    /// code alone.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Envelope<T>> {
        let response = request.send().await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            let message = Self::unauthorized_message(response).await;
            return Err(ClientError::Unauthorized { message });
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        if envelope.code != envelope::SUCCESS_CODE {
            let message = envelope.failure_message();
            tracing::debug!(code = envelope.code, message = %message, "API request failed");
            return Err(ClientError::Api {
                code: envelope.code,
                message,
            });
        }

        Ok(envelope)
    }

    /// Best-effort message extraction from a 401 body.
    async fn unauthorized_message(response: reqwest::Response) -> String {
        match response.json::<Envelope<serde_json::Value>>().await {
            Ok(envelope) => envelope.failure_message(),
            Err(_) => "unauthorized".to_string(),
        }
    }

    fn expect_data<T>(envelope: Envelope<T>) -> Result<T> {
        envelope
            .data
            .ok_or_else(|| ClientError::Decode("success envelope missing data".to_string()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_envelope_success_with_data() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"code": 200, "message": "success", "data": {"url": "x"}}"#)
                .unwrap();
        assert_eq!(envelope.code, 200);
        assert!(envelope.data.is_some());
        assert!(envelope.error.is_none());
    }

    #[test]
    fn test_envelope_tolerates_missing_data() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"code": 200, "message": "success"}"#).unwrap();
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_failure_message_prefers_message() {
        let envelope: Envelope<serde_json::Value> = serde_json::from_str(
            r#"{"code": 500, "message": "server exploded", "error": "stack trace"}"#,
        )
        .unwrap();
        assert_eq!(envelope.failure_message(), "server exploded");
    }

    #[test]
    fn test_failure_message_falls_back_to_error() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"code": 500, "message": "", "error": "stack trace"}"#)
                .unwrap();
        assert_eq!(envelope.failure_message(), "stack trace");
    }

    #[test]
    fn test_failure_message_generic_fallback() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"code": 500, "message": ""}"#).unwrap();
        assert_eq!(envelope.failure_message(), "request failed");
    }

    #[test]
    fn test_expect_data_rejects_empty_success() {
        let envelope: Envelope<serde_json::Value> =
            serde_json::from_str(r#"{"code": 200, "message": "success"}"#).unwrap();
        assert!(matches!(
            ApiClient::expect_data(envelope),
            Err(ClientError::Decode(_))
        ));
    }

    #[test]
    fn test_base_url_join_strips_trailing_slash() {
        let config = ClientConfig::new().with_api_base_url("http://localhost:8080/");
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.url("/auth/session"), "http://localhost:8080/auth/session");
    }
}
