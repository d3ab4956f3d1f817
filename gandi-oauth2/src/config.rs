use std::time::Duration;

use url::Url;

// URLs of Gandi ID, the OAuth2.0 authorization server.
pub const GANDI_AUTHORIZATION_URL: &str = "https://id.gandi.net/authorize";
pub const GANDI_TOKEN_URL: &str = "https://id.gandi.net/token";
pub const GANDI_TOKENINFO_URL: &str = "https://id.gandi.net/tokeninfo";

/// Timeout applied to each HTTP call made against the provider.
pub(crate) const PROVIDER_TIMEOUT: Duration = Duration::from_secs(15);

/// Safety margin subtracted from the provider-reported token lifetime,
/// covering clock skew and in-flight latency.
pub(crate) const EXPIRY_DRIFT_SECS: i64 = 30;

/// Configuration of the Gandi ID strategy.
///
/// `client_id`, `client_secret` and `callback_url` are issued when
/// registering the application at Gandi; everything else has a working
/// default. Immutable once handed to [`GandiStrategy::new`].
///
/// [`GandiStrategy::new`]: crate::GandiStrategy::new
#[derive(Clone)]
pub struct StrategyOptions {
    /// OAuth2 client identifier of the registered application.
    pub client_id: String,
    /// OAuth2 client secret of the registered application.
    pub client_secret: String,
    /// Callback URL the provider redirects back to. Must be registered
    /// at Gandi.
    pub callback_url: String,

    /// Scopes to request. The scopes are fixed on the application
    /// registration; listing a subset here restricts the grant further.
    pub scope: Vec<String>,
    /// Separator used when joining `scope` into the authorize request.
    /// Defaults to a single space.
    pub scope_separator: String,
    /// Fixed value for the OAuth2 state parameter. When unset, a random
    /// state token is generated per authorization request.
    pub state: Option<String>,
    /// Key under which the host session stores the token slot. Defaults
    /// to `oauth2:<authorization host>`.
    pub session_key: Option<String>,

    /// Override for the authorize endpoint, for testing purposes.
    pub authorization_url: String,
    /// Override for the token endpoint, for testing purposes.
    pub token_url: String,
    /// Override for the tokeninfo endpoint, for testing purposes.
    pub token_info_url: String,
}

impl StrategyOptions {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            callback_url: callback_url.into(),
            scope: Vec::new(),
            scope_separator: " ".to_string(),
            state: None,
            session_key: None,
            authorization_url: GANDI_AUTHORIZATION_URL.to_string(),
            token_url: GANDI_TOKEN_URL.to_string(),
            token_info_url: GANDI_TOKENINFO_URL.to_string(),
        }
    }

    pub fn with_scope(mut self, scope: Vec<String>) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Session key for the token slot, deriving the
    /// `oauth2:<authorization host>` default when none was configured.
    pub fn session_key(&self) -> String {
        match &self.session_key {
            Some(key) => key.clone(),
            None => {
                let host = Url::parse(&self.authorization_url)
                    .ok()
                    .and_then(|url| url.host_str().map(str::to_owned))
                    .unwrap_or_else(|| "gandi".to_string());
                format!("oauth2:{host}")
            }
        }
    }
}

impl std::fmt::Debug for StrategyOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyOptions")
            .field("client_id", &self.client_id)
            .field("client_secret", &"****")
            .field("callback_url", &self.callback_url)
            .field("scope", &self.scope)
            .field("scope_separator", &self.scope_separator)
            .field("state", &self.state)
            .field("session_key", &self.session_key)
            .field("authorization_url", &self.authorization_url)
            .field("token_url", &self.token_url)
            .field("token_info_url", &self.token_info_url)
            .finish()
    }
}
