//! Login page route configuration.

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::api::middleware::rate_limit;
use crate::state::AppState;
use crate::web::handlers::{
    dashboard_handler, index_handler, login_page_handler, login_submit_handler, logout_handler,
};
use crate::web::middleware::{session, web_auth};

/// Pages requiring a signed-in user.
///
/// Protected via [`crate::web::middleware::web_auth`].
///
/// # Endpoints
///
/// - `GET /dashboard` - Post-login landing page
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard_handler))
        .route_layer(middleware::from_fn(web_auth::layer))
}

/// Pages open to everyone.
///
/// # Endpoints
///
/// - `GET /` - Redirect to the login page
/// - `GET /login` - Login form
/// - `POST /login` - Login submission
/// - `POST /logout` - End the session
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/login", get(login_page_handler).post(login_submit_handler))
        .route("/logout", post(logout_handler))
}

/// All browser routes wrapped in the session layer.
///
/// With `rate_limited`, the public pages sit behind
/// [`crate::api::middleware::rate_limit::layer`], which needs the peer address
/// from `ConnectInfo`.
pub fn routes(state: &AppState, rate_limited: bool) -> Router<AppState> {
    let public = if rate_limited {
        public_routes().layer(rate_limit::layer())
    } else {
        public_routes()
    };

    Router::new()
        .merge(protected_routes())
        .merge(public)
        .layer(middleware::from_fn_with_state(state.clone(), session::layer))
}
