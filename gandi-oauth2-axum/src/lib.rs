//! gandi-oauth2-axum - axum glue for the Gandi ID OAuth2 strategy
//!
//! Provides the two routes a host application mounts to log users in
//! against Gandi ID: `/login` redirects to the authorize endpoint and
//! arms a short-lived state cookie, `/authorized` checks the state,
//! runs the code exchange and profile resolution, and leaves the
//! session holding the token pair.
//!
//! Session storage stays with the host: implement [`SessionLayer`] on
//! top of whatever session mechanism the application already has.

mod config;
mod error;
mod handlers;
mod router;
mod session;

pub use handlers::{AuthResponse, AuthState, authorized, login};
pub use router::router;
pub use session::{OpenedSession, SessionLayer};
