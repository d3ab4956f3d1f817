use serde::{Deserialize, Serialize};

/// Profile information returned by the `/tokeninfo` endpoint.
///
/// `user_id` and `expires_in` are always present; the rest depends on
/// the scopes granted to the registered application. Responses missing
/// a required field are rejected at the deserialization boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInfo {
    /// Identifier of the authenticated user. Immutable field.
    pub user_id: String,
    /// Username of the authenticated user; requires the
    /// `account:public` scope on the registered app.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Language of the authenticated user; requires the
    /// `account:public` scope on the registered app.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Email of the authenticated user, scope-dependent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Number of seconds until the access token expires.
    pub expires_in: u64,
}

/// Body of a successful `grant_type=refresh_token` response.
#[derive(Debug, Deserialize)]
pub(crate) struct RefreshTokenResponse {
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
    pub(crate) expires_in: u64,
}
