//! Identity gateway trait.

use crate::error::Result;
use crate::providers::CallbackResponse;
use crate::state::{OAuthProvider, ProviderDescriptor, UserProfile};

/// Gateway to the backend's identity endpoints.
///
/// This trait abstracts over every authentication round trip the client
/// makes. Effects call it; reducers never touch the network directly.
///
/// # Implementation Notes
///
/// - Implementations map HTTP 401 to `ClientError::Unauthorized` so effects
///   can route session expiry uniformly
/// - All methods are cancellation-safe: dropping the future leaves no
///   client-side state behind
pub trait IdentityGateway: Send + Sync {
    /// List the sign-in providers the backend advertises.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the envelope is malformed.
    fn providers(&self) -> impl std::future::Future<Output = Result<Vec<ProviderDescriptor>>> + Send;

    /// Fetch the authorization URL for a provider sign-in.
    ///
    /// # Arguments
    ///
    /// - `provider`: Provider the user chose
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the provider is not supported.
    fn authorization_url(
        &self,
        provider: OAuthProvider,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    /// Exchange an authorization code for a session.
    ///
    /// # Arguments
    ///
    /// - `provider`: Provider the code came from
    /// - `code`: Authorization code from the provider redirect
    ///
    /// # Returns
    ///
    /// The new session descriptor, the user profile, and the bearer token.
    ///
    /// # Errors
    ///
    /// Returns error if the exchange fails or the code is invalid.
    fn exchange_code(
        &self,
        provider: OAuthProvider,
        code: &str,
    ) -> impl std::future::Future<Output = Result<CallbackResponse>> + Send;

    /// Validate a stored token and fetch the profile it belongs to.
    ///
    /// # Arguments
    ///
    /// - `token`: Bearer token restored from storage
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network request fails
    /// - Token is no longer valid → `ClientError::Unauthorized`
    fn fetch_session(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<UserProfile>> + Send;

    /// Revoke the session behind a token.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network request fails
    /// - Token is no longer valid → `ClientError::Unauthorized`
    fn sign_out(&self, token: &str) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Verify an email address with the token from the verification link.
    ///
    /// # Returns
    ///
    /// The confirmation message returned by the backend.
    ///
    /// # Errors
    ///
    /// Returns error if the token is invalid or expired.
    fn verify_email(&self, token: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}
