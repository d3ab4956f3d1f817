use thiserror::Error;

use crate::session::SessionError;

#[derive(Debug, Error, Clone)]
pub enum StrategyError {
    #[error("request session must be initialized first")]
    MissingSession,

    #[error("invalid strategy configuration: {0}")]
    Config(String),

    #[error("token exchange error: {0}")]
    TokenExchange(String),

    #[error("token refresh error: {0}")]
    TokenRefresh(String),

    #[error("fetch token info error: {0}")]
    FetchTokenInfo(String),

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// Error from session operations
    #[error("session error: {0}")]
    Session(#[from] SessionError),
}
