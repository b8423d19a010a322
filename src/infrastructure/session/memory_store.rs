//! In-process session store.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use super::service::{SessionResult, SessionStore};
use super::token::SessionToken;

struct Entry {
    values: HashMap<String, Value>,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Upper bound on the time between two expiry sweeps.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

struct Sessions {
    entries: HashMap<SessionToken, Entry>,
    next_sweep: Instant,
}

impl Sessions {
    /// Drops every expired entry, at most once per `interval`.
    fn sweep_if_due(&mut self, now: Instant, interval: Duration) {
        if now < self.next_sweep {
            return;
        }

        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        self.next_sweep = now + interval;

        let swept = before - self.entries.len();
        if swept > 0 {
            debug!("Swept {} expired sessions", swept);
        }
    }
}

/// A session store backed by a `HashMap` behind an async `RwLock`.
///
/// Sessions are lost on restart and are not shared between processes.
/// Used when Redis is not configured or unreachable, and in tests.
///
/// Expired sessions are treated as absent on access. Writes also sweep
/// the whole map once per sweep interval, so tokens that are never
/// presented again do not accumulate.
pub struct MemorySessionStore {
    sessions: RwLock<Sessions>,
    ttl: Duration,
    sweep_interval: Duration,
}

impl MemorySessionStore {
    /// Creates an empty store whose sessions expire after `ttl` of inactivity.
    pub fn new(ttl: Duration) -> Self {
        debug!("Using MemorySessionStore (sessions are process-local)");
        Self {
            sessions: RwLock::new(Sessions {
                entries: HashMap::new(),
                next_sweep: Instant::now(),
            }),
            ttl,
            sweep_interval: ttl.min(MAX_SWEEP_INTERVAL),
        }
    }

    /// Number of live sessions. Expired ones are not counted.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.sessions
            .read()
            .await
            .entries
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of entries held, expired or not.
    #[cfg(test)]
    async fn raw_len(&self) -> usize {
        self.sessions.read().await.entries.len()
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(7200))
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, token: &SessionToken, key: &str) -> SessionResult<Option<Value>> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        match sessions.entries.get(token) {
            Some(entry) if entry.is_expired(now) => {
                sessions.entries.remove(token);
                Ok(None)
            }
            Some(entry) => Ok(entry.values.get(key).cloned()),
            None => Ok(None),
        }
    }

    async fn set(&self, token: &SessionToken, key: &str, value: Value) -> SessionResult<()> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        sessions.sweep_if_due(now, self.sweep_interval);

        let entry = sessions.entries.entry(token.clone()).or_insert_with(|| Entry {
            values: HashMap::new(),
            expires_at: now,
        });

        if entry.is_expired(now) {
            entry.values.clear();
        }

        entry.values.insert(key.to_string(), value);
        entry.expires_at = now + self.ttl;

        Ok(())
    }

    async fn delete(&self, token: &SessionToken, key: &str) -> SessionResult<()> {
        let mut sessions = self.sessions.write().await;

        if let Some(entry) = sessions.entries.get_mut(token) {
            entry.values.remove(key);
        }

        Ok(())
    }

    async fn regenerate(&self, token: &SessionToken) -> SessionResult<SessionToken> {
        let now = Instant::now();
        let new_token = SessionToken::generate();
        let mut sessions = self.sessions.write().await;

        if let Some(mut entry) = sessions.entries.remove(token)
            && !entry.is_expired(now)
        {
            entry.expires_at = now + self.ttl;
            sessions.entries.insert(new_token.clone(), entry);
        }
        sessions.sweep_if_due(now, self.sweep_interval);

        debug!("Session regenerated: {:?} -> {:?}", token, new_token);
        Ok(new_token)
    }

    async fn destroy(&self, token: &SessionToken) -> SessionResult<()> {
        self.sessions.write().await.entries.remove(token);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
