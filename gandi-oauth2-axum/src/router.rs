use axum::{Router, routing::get};

use super::handlers::{AuthState, authorized, login};

/// Routes for the Gandi ID login flow, ready to nest under a prefix of
/// the host application's choosing.
pub fn router(state: AuthState) -> Router {
    Router::new()
        .route("/login", get(login))
        .route("/authorized", get(authorized))
        .with_state(state)
}
