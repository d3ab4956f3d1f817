use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, RedirectUrl, Scope,
    TokenResponse, TokenUrl,
};
use url::Url;

use crate::config::{PROVIDER_TIMEOUT, StrategyOptions};
use crate::errors::StrategyError;
use crate::session::SessionHandle;
use crate::tokens::Tokens;
use crate::types::ProfileInfo;
use crate::utils::http_client;

/// Gandi ID authentication strategy.
///
/// Holds a configured [`oauth2::basic::BasicClient`] for the
/// authorization-code machinery and keeps only the provider-specific
/// pieces here: endpoint defaults, credentials, and the profile
/// resolution step that runs after the code exchange.
pub struct GandiStrategy {
    options: StrategyOptions,
    client: BasicClient,
    http: reqwest::Client,
}

impl GandiStrategy {
    /// Name under which a host application routes authentication to
    /// this strategy.
    pub const NAME: &'static str = "gandi";

    pub fn new(options: StrategyOptions) -> Result<Self, StrategyError> {
        let auth_url = AuthUrl::new(options.authorization_url.clone())
            .map_err(|e| StrategyError::Config(format!("authorization URL: {e}")))?;
        let token_url = TokenUrl::new(options.token_url.clone())
            .map_err(|e| StrategyError::Config(format!("token URL: {e}")))?;
        let redirect_url = RedirectUrl::new(options.callback_url.clone())
            .map_err(|e| StrategyError::Config(format!("callback URL: {e}")))?;
        Url::parse(&options.token_info_url)
            .map_err(|e| StrategyError::Config(format!("tokeninfo URL: {e}")))?;

        // Gandi expects client credentials in the request body, not in
        // a basic-auth header.
        let client = BasicClient::new(
            ClientId::new(options.client_id.clone()),
            Some(ClientSecret::new(options.client_secret.clone())),
            auth_url,
            Some(token_url),
        )
        .set_auth_type(AuthType::RequestBody)
        .set_redirect_uri(redirect_url);

        Ok(Self {
            options,
            client,
            http: http_client(),
        })
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    pub fn options(&self) -> &StrategyOptions {
        &self.options
    }

    /// Authorize URL to redirect the user to, built by the external
    /// OAuth2 client from the configured endpoints and credentials.
    ///
    /// The returned state token must be checked against the `state`
    /// query parameter when the provider redirects back.
    pub fn authorize_url(&self) -> (Url, CsrfToken) {
        let fixed_state = self.options.state.clone();
        let mut request = self.client.authorize_url(move || match fixed_state {
            Some(state) => CsrfToken::new(state),
            None => CsrfToken::new_random(),
        });

        if !self.options.scope.is_empty() {
            if self.options.scope_separator == " " {
                for scope in &self.options.scope {
                    request = request.add_scope(Scope::new(scope.clone()));
                }
            } else {
                // Non-default separators collapse the list into one
                // scope value, the way the upstream registration
                // expects to see it.
                request = request.add_scope(Scope::new(
                    self.options.scope.join(&self.options.scope_separator),
                ));
            }
        }

        request.url()
    }

    /// Exchange an authorization code for an access/refresh token pair,
    /// delegated to the external OAuth2 client.
    pub async fn exchange_code(&self, code: String) -> Result<(String, String), StrategyError> {
        let exchange = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .request_async(async_http_client);
        let response = tokio::time::timeout(PROVIDER_TIMEOUT, exchange)
            .await
            .map_err(|_| StrategyError::TokenExchange("token exchange timed out".to_string()))?
            .map_err(|e| StrategyError::TokenExchange(e.to_string()))?;

        let access_token = response.access_token().secret().clone();
        let refresh_token = response
            .refresh_token()
            .ok_or_else(|| {
                StrategyError::MalformedResponse(
                    "refresh token not present in response".to_string(),
                )
            })?
            .secret()
            .clone();

        Ok((access_token, refresh_token))
    }

    /// Fetch profile info for an access token from the tokeninfo
    /// endpoint.
    pub async fn fetch_token_info(&self, access_token: &str) -> Result<ProfileInfo, StrategyError> {
        let response = self
            .http
            .get(&self.options.token_info_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| StrategyError::FetchTokenInfo(e.to_string()))?;

        match response.status() {
            reqwest::StatusCode::OK => {}
            status => return Err(StrategyError::FetchTokenInfo(status.to_string())),
        }

        let response_body = response
            .text()
            .await
            .map_err(|e| StrategyError::FetchTokenInfo(e.to_string()))?;

        tracing::debug!("Token info response body: {response_body}");
        let profile: ProfileInfo = serde_json::from_str(&response_body)
            .map_err(|e| StrategyError::MalformedResponse(format!("tokeninfo: {e}")))?;

        Ok(profile)
    }

    /// Resolve the authenticated identity for a fresh token pair: fetch
    /// the profile authoritatively, store the tokens in the session,
    /// hand the profile back to the host.
    ///
    /// Requires an initialized session; without one this fails before
    /// any provider call. On a fetch failure no session state is
    /// touched. Session persistence itself is fire-and-forget (see
    /// [`Tokens::save`]).
    pub async fn resolve_profile(
        &self,
        session: Option<&mut dyn SessionHandle>,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<ProfileInfo, StrategyError> {
        let Some(session) = session else {
            tracing::warn!("Authentication attempted without an initialized session");
            return Err(StrategyError::MissingSession);
        };

        let profile = self.fetch_token_info(access_token).await?;

        let tokens = Tokens::from_profile(&profile, access_token, refresh_token);
        tokens.save(session).await;

        Ok(profile)
    }

    /// Full post-redirect flow: exchange the authorization code, then
    /// resolve the profile into the session.
    pub async fn authenticate(
        &self,
        session: Option<&mut dyn SessionHandle>,
        code: String,
    ) -> Result<ProfileInfo, StrategyError> {
        let (access_token, refresh_token) = self.exchange_code(code).await?;
        self.resolve_profile(session, &access_token, &refresh_token)
            .await
    }
}
