use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::{TypedHeader, headers};

use gandi_oauth2::{GandiStrategy, Tokens};
use gandi_oauth2_axum::SessionLayer;

use crate::session::MemorySessions;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) strategy: Arc<GandiStrategy>,
    pub(crate) sessions: Arc<MemorySessions>,
}

pub(crate) async fn index(Query(params): Query<HashMap<String, String>>) -> Html<String> {
    let message = params
        .get("message")
        .map(|message| format!("<p><em>{message}</em></p>"))
        .unwrap_or_default();
    Html(format!(
        "<h1>Gandi ID demo</h1>{message}\
         <p><a href=\"/auth/login\">Sign in with Gandi</a></p>\
         <p><a href=\"/protected\">Protected page</a></p>"
    ))
}

/// Requires live tokens in the session; refreshes the pair when the
/// access token has expired.
pub(crate) async fn protected(
    State(app): State<AppState>,
    cookies: Option<TypedHeader<headers::Cookie>>,
) -> Response {
    let cookies = cookies.map(|TypedHeader(cookies)| cookies);
    let opened = match app.sessions.open(cookies.as_ref()).await {
        Ok(opened) => opened,
        Err(err) => return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    };
    let mut handle = opened.handle;

    let Some(mut tokens) = handle.tokens() else {
        return Redirect::to("/auth/login").into_response();
    };

    if tokens.has_expired() {
        tracing::debug!("Access token expired, refreshing");
        match Tokens::from_refresh_token(&tokens.refresh_token, app.strategy.options()).await {
            Ok(fresh) => {
                fresh.save(&mut *handle).await;
                tokens = fresh;
            }
            Err(err) => {
                let message = urlencoding::encode(&err.to_string()).into_owned();
                return Redirect::to(&format!("/?message={message}")).into_response();
            }
        }
    }

    match app.strategy.fetch_token_info(&tokens.access_token).await {
        Ok(profile) => {
            let username = profile.username.as_deref().unwrap_or("(no username scope)");
            Html(format!(
                "<h1>Signed in</h1><p>user_id: {}</p><p>username: {}</p>",
                profile.user_id, username
            ))
            .into_response()
        }
        Err(err) => (StatusCode::BAD_GATEWAY, err.to_string()).into_response(),
    }
}
