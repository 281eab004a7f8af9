use async_trait::async_trait;
use redis::Client as RedisClient;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::IntakeSession;

const KEY_PREFIX: &str = "cvlens:session";

/// Persistence for intake sessions, one JSON blob per session id.
///
/// Carried in `AppState` as `Arc<dyn SessionStore>`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Option<IntakeSession>, AppError>;
    async fn save(&self, session: &IntakeSession) -> Result<(), AppError>;
    /// Returns whether a session was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

fn session_key(id: Uuid) -> String {
    format!("{KEY_PREFIX}:{id}")
}

/// Redis-backed store. Every save refreshes the expiry.
pub struct RedisSessionStore {
    client: RedisClient,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub fn new(client: RedisClient, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: Uuid) -> Result<Option<IntakeSession>, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(session_key(id))
            .query_async(&mut conn)
            .await?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, session: &IntakeSession) -> Result<(), AppError> {
        let json = serde_json::to_string(session)?;
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        redis::cmd("SET")
            .arg(session_key(session.id))
            .arg(json)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        debug!("Saved session {}", session.id);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let removed: i64 = redis::cmd("DEL")
            .arg(session_key(id))
            .query_async(&mut conn)
            .await?;
        Ok(removed > 0)
    }
}
