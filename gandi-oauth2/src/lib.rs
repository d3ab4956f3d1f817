//! gandi-oauth2 - Gandi ID OAuth2.0 authentication strategy
//!
//! This crate implements the provider-specific pieces of a login flow
//! against Gandi ID, the OAuth2.0 authorization server at
//! `https://id.gandi.net`: endpoint configuration, a token value object
//! with expiry/refresh bookkeeping, and the profile resolution step that
//! turns a fresh access token into an application-visible identity.
//!
//! The authorization-code machinery itself (authorize-URL construction,
//! state issuance, code-for-token exchange) is delegated to the `oauth2`
//! crate; session storage is delegated to the host application through
//! the [`SessionHandle`] trait.

mod config;
mod errors;
mod session;
mod strategy;
mod tokens;
mod types;
mod utils;

pub use config::{
    GANDI_AUTHORIZATION_URL, GANDI_TOKEN_URL, GANDI_TOKENINFO_URL, StrategyOptions,
};
pub use errors::StrategyError;
pub use session::{SessionError, SessionHandle};
pub use strategy::GandiStrategy;
pub use tokens::Tokens;
pub use types::ProfileInfo;

// Re-exported so integrations can name the state token type without
// depending on the `oauth2` crate directly.
pub use oauth2::CsrfToken;
