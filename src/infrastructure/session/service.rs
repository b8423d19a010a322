//! Session store trait and error types.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::token::SessionToken;

/// Errors that can occur during session store operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session store connection error: {0}")]
    Connection(String),
    #[error("Session store backend error: {0}")]
    Backend(#[from] redis::RedisError),
    #[error("Session value could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for session store operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Key/value storage for per-browser sessions.
///
/// Every operation is scoped to one [`SessionToken`]; sessions never see each
/// other's values. Values are JSON so that any serde type can be stored.
///
/// # Implementations
///
/// - [`crate::infrastructure::session::RedisSessionStore`] - Redis hash per session with idle TTL
/// - [`crate::infrastructure::session::MemorySessionStore`] - Process-local map for development and tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Reads a single value.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` if the session holds `key`
    /// - `Ok(None)` if the key or the whole session is absent or expired
    async fn get(&self, token: &SessionToken, key: &str) -> SessionResult<Option<Value>>;

    /// Writes a single value, creating the session if needed and refreshing
    /// its idle TTL.
    async fn set(&self, token: &SessionToken, key: &str, value: Value) -> SessionResult<()>;

    /// Removes a single value. Removing an absent key is not an error.
    async fn delete(&self, token: &SessionToken, key: &str) -> SessionResult<()>;

    /// Moves the session's data to a freshly generated token.
    ///
    /// After this call the old token resolves to nothing. Returns the new
    /// token, which the caller must hand back to the client.
    async fn regenerate(&self, token: &SessionToken) -> SessionResult<SessionToken>;

    /// Deletes the whole session.
    async fn destroy(&self, token: &SessionToken) -> SessionResult<()>;

    /// Checks if the store backend is reachable.
    ///
    /// Used by the health endpoint.
    async fn health_check(&self) -> bool;
}
