//! Per-request session handle.
//!
//! A [`Session`] binds one request to one [`SessionToken`] in the configured
//! [`SessionStore`]. The session middleware creates it, handlers read and
//! write through it, and afterwards the middleware asks it whether the client
//! needs a new cookie.

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entities::SessionUser;
use crate::infrastructure::session::{SessionResult, SessionStore, SessionToken};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "login_session";

/// Session keys used by the web layer.
pub mod keys {
    pub const USER_ID: &str = "user_id";
    pub const USER_NAME: &str = "user_name";
    pub const USER_EMAIL: &str = "user_email";
    pub const LOGGED_IN_AT: &str = "logged_in_at";

    /// Single-read slot for [`crate::web::flash::FlashState`].
    pub const FLASH: &str = "login_flash";
}

/// Attributes of the session cookie.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub secure: bool,
    pub max_age_seconds: u64,
}

impl SessionCookie {
    /// `Set-Cookie` value handing `token` to the client.
    pub fn set_cookie(&self, token: &SessionToken) -> String {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            SESSION_COOKIE_NAME,
            token.as_str(),
            self.max_age_seconds
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// `Set-Cookie` value telling the client to drop its token.
    pub fn clear_cookie(&self) -> String {
        let mut cookie = format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
            SESSION_COOKIE_NAME
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

impl Default for SessionCookie {
    fn default() -> Self {
        Self {
            secure: false,
            max_age_seconds: 7200,
        }
    }
}

/// What the response must tell the client about its session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieUpdate {
    /// The client already holds the right token, or nothing was stored.
    Keep,
    /// The client must switch to this token.
    Set(SessionToken),
    /// The session was destroyed and nothing replaced it.
    Clear,
}

struct SessionState {
    token: SessionToken,
    presented: Option<SessionToken>,
    written: bool,
    destroyed: bool,
}

/// Handle to the current request's session.
///
/// Cheap to clone; clones share the same token.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
    state: Arc<Mutex<SessionState>>,
}

impl Session {
    /// Binds to the token the client presented, or to a fresh one.
    ///
    /// A fresh token is only sent to the client once something is written.
    pub fn new(store: Arc<dyn SessionStore>, presented: Option<SessionToken>) -> Self {
        let token = presented.clone().unwrap_or_else(SessionToken::generate);

        Self {
            store,
            state: Arc::new(Mutex::new(SessionState {
                token,
                presented,
                written: false,
                destroyed: false,
            })),
        }
    }

    /// The token this session is currently bound to.
    pub async fn token(&self) -> SessionToken {
        self.state.lock().await.token.clone()
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> SessionResult<Option<T>> {
        let token = self.token().await;

        match self.store.get(&token, key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn insert<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> SessionResult<()> {
        let value = serde_json::to_value(value)?;
        let mut state = self.state.lock().await;

        self.store.set(&state.token, key, value).await?;
        state.written = true;

        Ok(())
    }

    pub async fn remove(&self, key: &str) -> SessionResult<()> {
        let token = self.token().await;
        self.store.delete(&token, key).await
    }

    /// Reads a value and deletes it from the store.
    ///
    /// The value is deleted before it is decoded, so a value that fails to
    /// decode is still gone afterwards.
    pub async fn take<T: DeserializeOwned>(&self, key: &str) -> SessionResult<Option<T>> {
        let token = self.token().await;

        let Some(value) = self.store.get(&token, key).await? else {
            return Ok(None);
        };
        self.store.delete(&token, key).await?;

        Ok(Some(serde_json::from_value(value)?))
    }

    /// Moves the session's data to a new token and invalidates the old one.
    pub async fn regenerate(&self) -> SessionResult<()> {
        let mut state = self.state.lock().await;

        let new_token = self.store.regenerate(&state.token).await?;
        state.token = new_token;
        state.written = true;

        Ok(())
    }

    /// Deletes every value and rebinds the handle to a fresh, empty token.
    pub async fn destroy(&self) -> SessionResult<()> {
        let mut state = self.state.lock().await;

        self.store.destroy(&state.token).await?;
        state.token = SessionToken::generate();
        state.written = false;
        state.destroyed = true;

        Ok(())
    }

    /// Rotates the token, then writes the authenticated identity under the
    /// new one.
    ///
    /// The token the client presented never carries the identity. If a write
    /// fails after rotation, the new session is destroyed so no partial
    /// identity survives.
    pub async fn sign_in(&self, user: &SessionUser) -> SessionResult<()> {
        self.regenerate().await?;

        if let Err(e) = self.write_identity(user).await {
            if let Err(cleanup) = self.destroy().await {
                tracing::warn!(error = %cleanup, "Failed to discard half-written session");
            }
            return Err(e);
        }

        Ok(())
    }

    async fn write_identity(&self, user: &SessionUser) -> SessionResult<()> {
        self.insert(keys::USER_ID, &user.user_id).await?;
        self.insert(keys::USER_NAME, &user.user_name).await?;
        self.insert(keys::USER_EMAIL, &user.user_email).await?;
        self.insert(keys::LOGGED_IN_AT, &user.logged_in_at).await
    }

    /// Reads the authenticated identity, if any.
    ///
    /// A session missing any identity key counts as anonymous.
    pub async fn current_user(&self) -> SessionResult<Option<SessionUser>> {
        let Some(user_id) = self.get::<i64>(keys::USER_ID).await? else {
            return Ok(None);
        };
        let Some(user_name) = self.get::<String>(keys::USER_NAME).await? else {
            return Ok(None);
        };
        let Some(user_email) = self.get::<String>(keys::USER_EMAIL).await? else {
            return Ok(None);
        };
        let logged_in_at = self
            .get::<DateTime<Utc>>(keys::LOGGED_IN_AT)
            .await?
            .unwrap_or_else(Utc::now);

        Ok(Some(SessionUser {
            user_id,
            user_name,
            user_email,
            logged_in_at,
        }))
    }

    /// Decides which `Set-Cookie`, if any, the response needs.
    pub async fn cookie_update(&self) -> CookieUpdate {
        let state = self.state.lock().await;

        if state.presented.as_ref() == Some(&state.token) {
            return CookieUpdate::Keep;
        }

        if state.written {
            CookieUpdate::Set(state.token.clone())
        } else if state.destroyed && state.presented.is_some() {
            CookieUpdate::Clear
        } else {
            CookieUpdate::Keep
        }
    }
}
