use async_trait::async_trait;
use thiserror::Error;

use crate::tokens::Tokens;

#[derive(Debug, Error, Clone)]
pub enum SessionError {
    #[error("session store error: {0}")]
    Store(String),

    #[error("session serde error: {0}")]
    Serde(String),
}

/// Host-provided handle to the per-request session.
///
/// Session storage is owned by the host application; the strategy only
/// reads and writes the token slot through this handle and asks it to
/// persist. The handle is scoped to one request, so no locking is done
/// here — serializing concurrent refreshes for the same session is the
/// host's call.
#[async_trait]
pub trait SessionHandle: Send {
    /// Tokens currently held in the session's token slot, if any.
    fn tokens(&self) -> Option<Tokens>;

    /// Replace the session's token slot.
    fn set_tokens(&mut self, tokens: Tokens);

    /// Persist the session to the host's backing store.
    async fn save(&mut self) -> Result<(), SessionError>;
}
