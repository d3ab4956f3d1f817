use async_trait::async_trait;
use axum_extra::headers::Cookie;

use gandi_oauth2::{SessionError, SessionHandle};

/// A session opened (or minted) for the current request.
pub struct OpenedSession {
    pub handle: Box<dyn SessionHandle>,
    /// `Set-Cookie` value to attach when the session did not exist yet.
    pub set_cookie: Option<String>,
}

/// Host-side session machinery.
///
/// The libraries do not own session storage; the host application
/// implements this on top of its session mechanism and hands the
/// callback handler a [`SessionHandle`] scoped to the request.
#[async_trait]
pub trait SessionLayer: Send + Sync {
    /// Open the session referenced by the request's cookies, creating
    /// one if none exists.
    async fn open(&self, cookies: Option<&Cookie>) -> Result<OpenedSession, SessionError>;
}
