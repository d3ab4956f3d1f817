use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum_extra::headers::Cookie;
use serde_json::Value;
use tokio::sync::Mutex;
use uuid::Uuid;

use gandi_oauth2::{SessionError, SessionHandle, Tokens};
use gandi_oauth2_axum::{OpenedSession, SessionLayer};

pub(crate) const SESSION_COOKIE_NAME: &str = "demo-session";

type SessionData = HashMap<String, Value>;

/// In-memory session store. This demo plays the host application, so
/// it owns session storage: one uuid cookie per browser, one map of
/// serialized values per session, tokens under the strategy's session
/// key.
pub(crate) struct MemorySessions {
    session_key: String,
    store: Arc<Mutex<HashMap<String, SessionData>>>,
}

impl MemorySessions {
    pub(crate) fn new(session_key: String) -> Self {
        Self {
            session_key,
            store: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl SessionLayer for MemorySessions {
    async fn open(&self, cookies: Option<&Cookie>) -> Result<OpenedSession, SessionError> {
        let existing = cookies
            .and_then(|cookies| cookies.get(SESSION_COOKIE_NAME))
            .map(str::to_owned);

        let (id, data, set_cookie) = match existing {
            Some(id) => match self.store.lock().await.get(&id).cloned() {
                Some(data) => (id, data, None),
                None => minted(),
            },
            None => minted(),
        };

        Ok(OpenedSession {
            handle: Box::new(MemorySessionHandle {
                id,
                session_key: self.session_key.clone(),
                data,
                store: self.store.clone(),
            }),
            set_cookie,
        })
    }
}

// A fresh session is only written to the store on save.
fn minted() -> (String, SessionData, Option<String>) {
    let id = Uuid::new_v4().to_string();
    let cookie = format!("{SESSION_COOKIE_NAME}={id}; SameSite=Lax; HttpOnly; Path=/");
    (id, SessionData::new(), Some(cookie))
}

struct MemorySessionHandle {
    id: String,
    session_key: String,
    data: SessionData,
    store: Arc<Mutex<HashMap<String, SessionData>>>,
}

#[async_trait]
impl SessionHandle for MemorySessionHandle {
    fn tokens(&self) -> Option<Tokens> {
        self.data
            .get(&self.session_key)
            .cloned()
            .and_then(|value| Tokens::from_json(value).ok())
    }

    fn set_tokens(&mut self, tokens: Tokens) {
        self.data.insert(self.session_key.clone(), tokens.to_json());
    }

    async fn save(&mut self) -> Result<(), SessionError> {
        self.store
            .lock()
            .await
            .insert(self.id.clone(), self.data.clone());
        Ok(())
    }
}
