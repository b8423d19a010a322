//! Session middleware for browser routes.

use axum::{
    extract::{Request, State},
    http::{
        HeaderMap, HeaderValue,
        header::{COOKIE, SET_COOKIE},
    },
    middleware::Next,
    response::Response,
};
use tracing::error;

use crate::infrastructure::session::SessionToken;
use crate::state::AppState;
use crate::web::session::{CookieUpdate, SESSION_COOKIE_NAME, Session};

/// Attaches a [`Session`] to every request and issues the session cookie.
///
/// # Flow
///
/// 1. Read `login_session` from the `Cookie` header
/// 2. Bind a [`Session`] to it, or to a fresh token if absent or malformed
/// 3. Run the handler, which reaches the session through `Extension<Session>`
/// 4. Append `Set-Cookie` if the token changed, was first written, or was
///    destroyed
///
/// A fresh session that nothing was written to sends no cookie.
pub async fn layer(State(st): State<AppState>, mut req: Request, next: Next) -> Response {
    let presented = session_token_from_headers(req.headers());
    let session = Session::new(st.sessions.clone(), presented);

    req.extensions_mut().insert(session.clone());

    let mut response = next.run(req).await;

    let cookie = match session.cookie_update().await {
        CookieUpdate::Keep => return response,
        CookieUpdate::Set(token) => st.session_cookie.set_cookie(&token),
        CookieUpdate::Clear => st.session_cookie.clear_cookie(),
    };

    match HeaderValue::from_str(&cookie) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(e) => error!(error = %e, "Failed to encode session cookie"),
    }

    response
}

/// Extracts a well-formed session token from the `Cookie` header.
fn session_token_from_headers(headers: &HeaderMap) -> Option<SessionToken> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|cookie_header| cookie_header.to_str().ok())
        .flat_map(|cookie_str| cookie_str.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(SESSION_COOKIE_NAME), Some(value)) => SessionToken::parse(value),
                _ => None,
            }
        })
}
