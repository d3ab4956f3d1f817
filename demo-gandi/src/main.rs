use std::{env, sync::Arc};

use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gandi_oauth2::{GandiStrategy, StrategyOptions};
use gandi_oauth2_axum::AuthState;

mod handlers;
mod session;

use crate::handlers::{AppState, index, protected};
use crate::session::MemorySessions;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let options = options_from_env()?;
    let session_key = options.session_key();
    let strategy = Arc::new(GandiStrategy::new(options)?);
    let sessions = Arc::new(MemorySessions::new(session_key));

    let auth_state = AuthState {
        strategy: strategy.clone(),
        sessions: sessions.clone(),
    };

    let app = Router::new()
        .route("/", get(index))
        .route("/protected", get(protected))
        .with_state(AppState { strategy, sessions })
        .nest("/auth", gandi_oauth2_axum::router(auth_state));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3001").await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

fn options_from_env() -> Result<StrategyOptions, env::VarError> {
    let mut options = StrategyOptions::new(
        env::var("GANDI_CLIENT_ID")?,
        env::var("GANDI_CLIENT_SECRET")?,
        env::var("GANDI_CALLBACK_URL")?,
    );
    if let Ok(scope) = env::var("GANDI_SCOPE") {
        options.scope = scope.split_whitespace().map(str::to_owned).collect();
    }
    if let Ok(url) = env::var("GANDI_AUTHORIZATION_URL") {
        options.authorization_url = url;
    }
    if let Ok(url) = env::var("GANDI_TOKEN_URL") {
        options.token_url = url;
    }
    if let Ok(url) = env::var("GANDI_TOKENINFO_URL") {
        options.token_info_url = url;
    }
    Ok(options)
}
