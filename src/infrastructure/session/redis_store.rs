//! Redis-backed session store.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde_json::Value;
use tracing::{debug, info};

use super::service::{SessionError, SessionResult, SessionStore};
use super::token::SessionToken;

/// Session store keeping one Redis hash per session.
///
/// Layout: `session:<hmac(token)>` -> `{ field: json }`. Every write refreshes
/// the hash's TTL, so sessions expire after a period of inactivity.
/// Uses `ConnectionManager` for automatic reconnection.
pub struct RedisSessionStore {
    client: ConnectionManager,
    ttl_seconds: u64,
    secret: Vec<u8>,
    key_prefix: String,
}

impl RedisSessionStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `ttl_seconds` - idle lifetime of a session (`SESSION_TTL_SECONDS`)
    /// - `secret` - HMAC key used to derive storage keys (`SESSION_SECRET`)
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Connection`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, ttl_seconds: u64, secret: &[u8]) -> SessionResult<Self> {
        info!("Connecting to Redis session store");

        let client = Client::open(redis_url).map_err(|e| {
            SessionError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            SessionError::Connection(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| SessionError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis session store");

        Ok(Self {
            client: manager,
            ttl_seconds,
            secret: secret.to_vec(),
            key_prefix: "session:".to_string(),
        })
    }

    /// Constructs the full Redis key with namespace prefix.
    fn build_key(&self, token: &SessionToken) -> String {
        format!("{}{}", self.key_prefix, token.storage_key(&self.secret))
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, token: &SessionToken, key: &str) -> SessionResult<Option<Value>> {
        let mut conn = self.client.clone();

        let raw: Option<String> = conn.hget(self.build_key(token), key).await?;

        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, token: &SessionToken, key: &str, value: Value) -> SessionResult<()> {
        let redis_key = self.build_key(token);
        let encoded = serde_json::to_string(&value)?;
        let mut conn = self.client.clone();

        redis::pipe()
            .atomic()
            .hset(&redis_key, key, encoded)
            .ignore()
            .expire(&redis_key, self.ttl_seconds as i64)
            .ignore()
            .query_async::<()>(&mut conn)
            .await?;

        debug!("Session SET field {}", key);
        Ok(())
    }

    async fn delete(&self, token: &SessionToken, key: &str) -> SessionResult<()> {
        let mut conn = self.client.clone();
        conn.hdel::<_, _, ()>(self.build_key(token), key).await?;
        Ok(())
    }

    async fn regenerate(&self, token: &SessionToken) -> SessionResult<SessionToken> {
        let old_key = self.build_key(token);
        let new_token = SessionToken::generate();
        let new_key = self.build_key(&new_token);
        let mut conn = self.client.clone();

        let exists: bool = conn.exists(&old_key).await?;
        if exists {
            // RENAME keeps the TTL; refresh it since this is activity.
            redis::pipe()
                .atomic()
                .rename(&old_key, &new_key)
                .ignore()
                .expire(&new_key, self.ttl_seconds as i64)
                .ignore()
                .query_async::<()>(&mut conn)
                .await?;
        }

        debug!("Session regenerated (carried data: {})", exists);
        Ok(new_token)
    }

    async fn destroy(&self, token: &SessionToken) -> SessionResult<()> {
        let mut conn = self.client.clone();
        conn.del::<_, ()>(self.build_key(token)).await?;
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
