//! Shared fixtures: a local mock of the provider's `/token` and
//! `/tokeninfo` endpoints, and an in-memory session handle.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::Form,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{get, post},
};
use serde_json::Value;

use gandi_oauth2::{SessionError, SessionHandle, StrategyOptions, Tokens};

pub struct MockProvider {
    pub base_url: String,
    pub token_hits: Arc<AtomicUsize>,
    pub tokeninfo_hits: Arc<AtomicUsize>,
    /// `Authorization` header seen by the last tokeninfo request.
    pub last_authorization: Arc<Mutex<Option<String>>>,
    /// Form fields seen by the last token request.
    pub last_token_form: Arc<Mutex<Option<HashMap<String, String>>>>,
}

/// Spawn a provider double on an ephemeral local port, answering every
/// token request and tokeninfo request with the given status and body.
pub async fn spawn_provider(
    token_response: (StatusCode, Value),
    tokeninfo_response: (StatusCode, Value),
) -> MockProvider {
    let token_hits = Arc::new(AtomicUsize::new(0));
    let tokeninfo_hits = Arc::new(AtomicUsize::new(0));
    let last_authorization = Arc::new(Mutex::new(None));
    let last_token_form = Arc::new(Mutex::new(None));

    let token_handler = {
        let hits = token_hits.clone();
        let last_form = last_token_form.clone();
        let (status, body) = token_response;
        move |Form(form): Form<HashMap<String, String>>| {
            hits.fetch_add(1, Ordering::SeqCst);
            *last_form.lock().unwrap() = Some(form);
            let body = body.clone();
            async move { (status, Json(body)) }
        }
    };

    let tokeninfo_handler = {
        let hits = tokeninfo_hits.clone();
        let last_auth = last_authorization.clone();
        let (status, body) = tokeninfo_response;
        move |headers: HeaderMap| {
            hits.fetch_add(1, Ordering::SeqCst);
            *last_auth.lock().unwrap() = headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body = body.clone();
            async move { (status, Json(body)) }
        }
    };

    let app = Router::new()
        .route("/token", post(token_handler))
        .route("/tokeninfo", get(tokeninfo_handler));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockProvider {
        base_url,
        token_hits,
        tokeninfo_hits,
        last_authorization,
        last_token_form,
    }
}

/// Strategy options with every endpoint pointed at the mock provider.
pub fn options_for(provider: &MockProvider) -> StrategyOptions {
    let mut options = StrategyOptions::new("8888", "****", "http://[::1]/callback");
    options.authorization_url = format!("{}/authorize", provider.base_url);
    options.token_url = format!("{}/token", provider.base_url);
    options.token_info_url = format!("{}/tokeninfo", provider.base_url);
    options
}

/// Minimal host session: a token slot plus save bookkeeping.
#[derive(Default)]
pub struct MockSession {
    pub tokens: Option<Tokens>,
    pub saves: usize,
    pub fail_save: bool,
}

#[async_trait]
impl SessionHandle for MockSession {
    fn tokens(&self) -> Option<Tokens> {
        self.tokens.clone()
    }

    fn set_tokens(&mut self, tokens: Tokens) {
        self.tokens = Some(tokens);
    }

    async fn save(&mut self) -> Result<(), SessionError> {
        if self.fail_save {
            return Err(SessionError::Store("backing store unavailable".to_string()));
        }
        self.saves += 1;
        Ok(())
    }
}
