//! Top-level router configuration combining browser and operational routes.
//!
//! # Route Structure
//!
//! - `GET  /`          - Redirect to `/login`
//! - `GET  /login`     - Login form (rate limited)
//! - `POST /login`     - Login submission (rate limited)
//! - `POST /logout`    - End the session (rate limited)
//! - `GET  /dashboard` - Post-login page (session required)
//! - `GET  /health`    - Health check: database and session store
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Sessions** - Cookie-bound session on every browser route
//! - **Rate limiting** - Per-IP token bucket on the public pages
//! - **Path normalization** - Trailing slash handling

use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api;
use crate::api::middleware::tracing;
use crate::state::AppState;
use crate::web;

/// Constructs the application router with all routes and middleware.
///
/// The rate limiter keys on the peer address, so the router must be served
/// with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .merge(web::routes::routes(&state, true))
        .merge(api::routes::routes())
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
