use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::SET_COOKIE},
    response::Redirect,
};
use axum_extra::{TypedHeader, headers};
use serde::Deserialize;
use subtle::ConstantTimeEq;

use gandi_oauth2::GandiStrategy;

use super::config::{
    GANDI_CSRF_COOKIE_MAX_AGE, GANDI_CSRF_COOKIE_NAME, GANDI_POST_LOGIN_REDIRECT,
};
use super::error::IntoResponseError;
use super::session::SessionLayer;

/// State shared by the auth handlers: the configured strategy and the
/// host's session machinery.
#[derive(Clone)]
pub struct AuthState {
    pub strategy: Arc<GandiStrategy>,
    pub sessions: Arc<dyn SessionLayer>,
}

/// Query parameters Gandi sends back to the callback URL.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub code: String,
    pub state: String,
}

/// Begin authentication: redirect to the authorize endpoint and arm
/// the single-use state cookie.
pub async fn login(
    State(state): State<AuthState>,
) -> Result<(HeaderMap, Redirect), (StatusCode, String)> {
    let (auth_url, csrf_token) = state.strategy.authorize_url();

    let cookie = format!(
        "{}={}; SameSite=Lax; Secure; HttpOnly; Path=/; Max-Age={}",
        *GANDI_CSRF_COOKIE_NAME,
        csrf_token.secret(),
        *GANDI_CSRF_COOKIE_MAX_AGE
    );

    let mut headers = HeaderMap::new();
    headers.append(
        SET_COOKIE,
        cookie.parse().map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to build state cookie".to_string(),
            )
        })?,
    );

    tracing::debug!("Redirecting to authorize URL: {auth_url}");
    Ok((headers, Redirect::to(auth_url.as_str())))
}

/// Provider callback: verify the state parameter against the cookie,
/// open the host session, and run the code exchange plus profile
/// resolution.
pub async fn authorized(
    State(state): State<AuthState>,
    cookies: Option<TypedHeader<headers::Cookie>>,
    Query(query): Query<AuthResponse>,
) -> Result<(HeaderMap, Redirect), (StatusCode, String)> {
    let cookies = cookies.map(|TypedHeader(cookies)| cookies);
    csrf_check(cookies.as_ref(), &query.state)?;

    let opened = state
        .sessions
        .open(cookies.as_ref())
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let mut handle = opened.handle;

    let profile = state
        .strategy
        .authenticate(Some(&mut *handle), query.code)
        .await
        .into_response_error()?;
    tracing::info!(user_id = %profile.user_id, "Authenticated against Gandi ID");

    let mut headers = HeaderMap::new();
    // The state cookie is single-use; expire it.
    let clear = format!(
        "{}=; SameSite=Lax; Secure; HttpOnly; Path=/; Max-Age=0",
        *GANDI_CSRF_COOKIE_NAME
    );
    headers.append(
        SET_COOKIE,
        clear.parse().map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to build state cookie".to_string(),
            )
        })?,
    );
    if let Some(set_cookie) = opened.set_cookie {
        headers.append(
            SET_COOKIE,
            set_cookie.parse().map_err(|_| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to build session cookie".to_string(),
                )
            })?,
        );
    }

    Ok((headers, Redirect::to(GANDI_POST_LOGIN_REDIRECT.as_str())))
}

fn csrf_check(
    cookies: Option<&headers::Cookie>,
    state_param: &str,
) -> Result<(), (StatusCode, String)> {
    let cookie_value = cookies
        .and_then(|cookies| cookies.get(GANDI_CSRF_COOKIE_NAME.as_str()))
        .ok_or((
            StatusCode::BAD_REQUEST,
            "No state cookie found".to_string(),
        ))?;

    if bool::from(cookie_value.as_bytes().ct_eq(state_param.as_bytes())) {
        Ok(())
    } else {
        tracing::error!("State parameter does not match the state cookie");
        Err((StatusCode::BAD_REQUEST, "State mismatch".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::HeaderValue;
    use axum::http::header::LOCATION;
    use axum::response::IntoResponse;
    use axum_extra::headers::{Cookie, Header};

    use gandi_oauth2::{SessionError, StrategyOptions};

    use crate::session::OpenedSession;

    struct NullSessions;

    #[async_trait]
    impl SessionLayer for NullSessions {
        async fn open(&self, _cookies: Option<&Cookie>) -> Result<OpenedSession, SessionError> {
            Err(SessionError::Store("no session backend".to_string()))
        }
    }

    fn auth_state() -> AuthState {
        let options = StrategyOptions::new("8888", "****", "http://[::1]/callback");
        AuthState {
            strategy: Arc::new(GandiStrategy::new(options).unwrap()),
            sessions: Arc::new(NullSessions),
        }
    }

    fn cookie(value: &str) -> Cookie {
        let value = HeaderValue::from_str(value).unwrap();
        Cookie::decode(&mut [&value].into_iter()).unwrap()
    }

    /// Test that the login handler redirects to the authorize endpoint
    /// and arms the state cookie with the strategy's state token.
    #[tokio::test]
    async fn test_login_redirects_and_sets_state_cookie() {
        let response = login(State(auth_state())).await.unwrap().into_response();

        let location = response
            .headers()
            .get(LOCATION)
            .expect("Location header should exist")
            .to_str()
            .unwrap();
        assert!(location.starts_with("https://id.gandi.net/authorize?"));
        assert!(location.contains("client_id=8888"));

        let set_cookie = response
            .headers()
            .get(SET_COOKIE)
            .expect("Set-Cookie header should exist")
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with("__Host-GandiCsrfId="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("Max-Age=60"));

        // The cookie value is the state parameter of the redirect.
        let state_value = set_cookie
            .strip_prefix("__Host-GandiCsrfId=")
            .unwrap()
            .split(';')
            .next()
            .unwrap();
        assert!(location.contains(&format!("state={state_value}")));
    }

    /// Test that a matching state parameter passes the check.
    #[test]
    fn test_csrf_check_match() {
        let cookies = cookie("__Host-GandiCsrfId=abc123");
        assert!(csrf_check(Some(&cookies), "abc123").is_ok());
    }

    /// Test that a mismatched state parameter is rejected.
    #[test]
    fn test_csrf_check_mismatch() {
        let cookies = cookie("__Host-GandiCsrfId=abc123");
        let result = csrf_check(Some(&cookies), "evil");

        assert!(result.is_err());
        if let Err((status, _)) = result {
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    /// Test that a missing state cookie is rejected before any
    /// provider call could happen.
    #[test]
    fn test_csrf_check_missing_cookie() {
        let result = csrf_check(None, "abc123");

        assert!(result.is_err());
        if let Err((status, message)) = result {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(message, "No state cookie found");
        }

        let other = cookie("unrelated=1");
        assert!(csrf_check(Some(&other), "abc123").is_err());
    }
}
