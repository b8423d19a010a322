//! Helpers for driving the browser routes in tests.

use axum::http::{HeaderValue, header};
use axum_test::{TestRequest, TestResponse, TestServer};
use std::sync::Arc;

use crate::domain::repositories::MockUserRepository;
use crate::infrastructure::session::{MemorySessionStore, SessionStore};
use crate::state::AppState;
use crate::web::session::{SESSION_COOKIE_NAME, SessionCookie};

/// Browser routes over `users` and an in-memory session store.
///
/// Rate limiting is left out: it keys on the peer address, which the
/// in-process transport does not provide.
pub(crate) fn test_server(users: MockUserRepository) -> (TestServer, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::default());
    let server = test_server_with_store(users, store.clone());

    (server, store)
}

/// Browser routes over `users` and an arbitrary session store.
pub(crate) fn test_server_with_store(
    users: MockUserRepository,
    sessions: Arc<dyn SessionStore>,
) -> TestServer {
    let state = AppState::new(Arc::new(users), sessions, SessionCookie::default());
    let router = crate::web::routes::routes(&state, false).with_state(state);

    TestServer::new(router).unwrap()
}

pub(crate) fn login_form<'a>(email: &'a str, password: &'a str) -> [(&'static str, &'a str); 2] {
    [("email", email), ("password", password)]
}

/// Token value from the response's `login_session` cookie, if one was set.
pub(crate) fn session_cookie(response: &TestResponse) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| {
            let pair = cookie.split(';').next()?;
            let value = pair.strip_prefix(SESSION_COOKIE_NAME)?.strip_prefix('=')?;
            (!value.is_empty()).then(|| value.to_string())
        })
}

pub(crate) fn with_cookie(request: TestRequest, token: &str) -> TestRequest {
    let cookie = format!("{SESSION_COOKIE_NAME}={token}");
    request.add_header(header::COOKIE, HeaderValue::from_str(&cookie).unwrap())
}
