use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{EXPIRY_DRIFT_SECS, StrategyOptions};
use crate::errors::StrategyError;
use crate::session::{SessionError, SessionHandle};
use crate::types::{ProfileInfo, RefreshTokenResponse};
use crate::utils::http_client;

/// Expiration date of an access token with a provider-reported lifetime
/// of `expires_in` seconds, under the 30-second drift rule.
pub(crate) fn expires_at_after(expires_in: u64) -> DateTime<Utc> {
    Utc::now() + Duration::seconds(expires_in as i64 - EXPIRY_DRIFT_SECS)
}

/// OAuth2 credential pair plus its expiration date.
///
/// An immutable value object: refreshing replaces it wholesale. The
/// serde representation matches the session wire format used by
/// existing deployments (`accessToken`/`refreshToken`/`expiresAt`, the
/// latter a millisecond timestamp), so stored sessions round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires_at: DateTime<Utc>,
}

impl Tokens {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_at,
        }
    }

    /// Reconstruct tokens from a serialized session record. No
    /// validation beyond field presence.
    pub fn from_json(value: serde_json::Value) -> Result<Self, SessionError> {
        serde_json::from_value(value).map_err(|e| SessionError::Serde(e.to_string()))
    }

    /// Serialized session record for this token pair.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("Failed to serialize Tokens")
    }

    /// Build tokens from profile info, just after the authorization
    /// code dance. The profile's `expires_in` is authoritative.
    pub fn from_profile(
        profile: &ProfileInfo,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self::new(
            access_token,
            refresh_token,
            expires_at_after(profile.expires_in),
        )
    }

    /// Obtain a fresh token pair from a refresh token, once the access
    /// token has expired. [`Tokens::save`] has to be called to keep the
    /// new pair in the session.
    ///
    /// A transport failure, timeout or non-2xx status is terminal for
    /// the attempt; there is no retry.
    pub async fn from_refresh_token(
        refresh_token: &str,
        options: &StrategyOptions,
    ) -> Result<Self, StrategyError> {
        let client = http_client();
        let response = client
            .post(&options.token_url)
            .form(&[
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
                ("client_id", options.client_id.as_str()),
                ("client_secret", options.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| StrategyError::TokenRefresh(e.to_string()))?;

        match response.status() {
            reqwest::StatusCode::OK => {}
            status => return Err(StrategyError::TokenRefresh(status.to_string())),
        }

        let response_body = response
            .text()
            .await
            .map_err(|e| StrategyError::TokenRefresh(e.to_string()))?;
        let refreshed: RefreshTokenResponse = serde_json::from_str(&response_body)
            .map_err(|e| StrategyError::MalformedResponse(format!("token endpoint: {e}")))?;

        tracing::debug!("Refreshed tokens against {}", options.token_url);
        Ok(Self::new(
            refreshed.access_token,
            refreshed.refresh_token,
            expires_at_after(refreshed.expires_in),
        ))
    }

    /// Write the tokens into the session and ask it to persist.
    ///
    /// Persistence errors are logged and swallowed: failing a login
    /// over a session-write echo is worse than a stale session.
    pub async fn save(&self, session: &mut dyn SessionHandle) {
        session.set_tokens(self.clone());
        if let Err(err) = session.save().await {
            tracing::warn!("Error {err} while saving the session");
        }
    }

    /// Check if the access token is dead or alive.
    pub fn has_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
