//! Session persistence boundary.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use crate::session::SessionData;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session backend unavailable")]
    Backend(#[source] anyhow::Error),
    #[error("session payload is not valid")]
    Codec(#[from] serde_json::Error),
}

/// Load/save contract of the host's session store.
///
/// Futures are `Send` so the store can back an axum middleware generically.
pub trait SessionStore: Clone + Send + Sync + 'static {
    fn load(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<SessionData>, SessionError>> + Send;

    fn save(
        &self,
        id: &str,
        data: &SessionData,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;
}

/// Process-local store. Sessions live until the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, SessionData>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a session directly, bypassing the middleware.
    pub fn insert(&self, id: impl Into<String>, data: SessionData) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.into(), data);
    }

    pub fn get(&self, id: &str) -> Option<SessionData> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &str) -> Result<Option<SessionData>, SessionError> {
        Ok(self.get(id))
    }

    async fn save(&self, id: &str, data: &SessionData) -> Result<(), SessionError> {
        self.insert(id, data.clone());
        Ok(())
    }
}
