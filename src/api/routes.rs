//! Operational JSON routes.

use axum::{Router, routing::get};

use crate::api::handlers::health_handler;
use crate::state::AppState;

/// Routes for monitoring, outside the session layer and rate limiting.
///
/// # Endpoints
///
/// - `GET /health` - Database and session store status
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
