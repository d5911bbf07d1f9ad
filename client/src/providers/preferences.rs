//! Preferences gateway trait.

use crate::error::Result;
use crate::state::PreferencesPatch;

/// Gateway to the backend's preferences endpoints.
///
/// The backend returns and accepts partial preference maps, so both
/// directions speak [`PreferencesPatch`]. Merging a fetched patch into the
/// entity is the reducer's job.
pub trait PreferencesGateway: Send + Sync {
    /// Fetch the server's copy of the preferences.
    ///
    /// # Arguments
    ///
    /// - `bearer`: Current session token, or `None` when signed out; the
    ///   backend decides what anonymous callers may read
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network request fails
    /// - Token is no longer valid → `ClientError::Unauthorized`
    fn fetch(
        &self,
        bearer: Option<&str>,
    ) -> impl std::future::Future<Output = Result<PreferencesPatch>> + Send;

    /// Write a partial update to the server.
    ///
    /// The backend acknowledges without echoing the entity; callers apply
    /// the same patch locally once this resolves.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network request fails
    /// - Token is no longer valid → `ClientError::Unauthorized`
    fn update(
        &self,
        bearer: Option<&str>,
        patch: &PreferencesPatch,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
