use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;

use tfagate_session::session::SessionData;
use tfagate_session::store::{SessionError, SessionStore};

/// Redis-backed session store. Each session is a JSON blob under `session:{id}`
/// whose TTL is refreshed on every save.
#[derive(Clone)]
pub struct RedisSessionStore {
    pub pool: Pool,
    pub ttl_secs: u64,
}

fn session_key(id: &str) -> String {
    format!("session:{id}")
}

impl SessionStore for RedisSessionStore {
    async fn load(&self, id: &str) -> Result<Option<SessionData>, SessionError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| SessionError::Backend(e.into()))?;
        let raw: Option<Vec<u8>> = conn
            .get(session_key(id))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| SessionError::Backend(e.into()))?;
        raw.map(|bytes| serde_json::from_slice(&bytes))
            .transpose()
            .map_err(SessionError::from)
    }

    async fn save(&self, id: &str, data: &SessionData) -> Result<(), SessionError> {
        let payload = serde_json::to_vec(data)?;
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| SessionError::Backend(e.into()))?;
        let (): () = conn
            .set_ex(session_key(id), payload, self.ttl_secs)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| SessionError::Backend(e.into()))?;
        Ok(())
    }
}
