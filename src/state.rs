//! Shared application state.

use std::sync::Arc;

use crate::application::services::LoginService;
use crate::domain::repositories::UserRepository;
use crate::infrastructure::session::SessionStore;
use crate::web::session::SessionCookie;

/// State injected into every handler and middleware.
///
/// Cloned per request; all members are reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub login_service: Arc<LoginService>,
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionStore>,
    pub session_cookie: SessionCookie,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionStore>,
        session_cookie: SessionCookie,
    ) -> Self {
        Self {
            login_service: Arc::new(LoginService::new(users.clone())),
            users,
            sessions,
            session_cookie,
        }
    }
}
