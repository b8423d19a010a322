//! Logout handler.

use axum::{Extension, response::Response};
use tracing::{error, info, warn};

use super::found;
use crate::web::flash::FlashState;
use crate::web::session::Session;

/// Notice shown on the login page after logging out.
pub const LOGGED_OUT_MESSAGE: &str = "You have been logged out.";

/// Ends the session and returns to the login page.
///
/// # Endpoint
///
/// `POST /logout`
///
/// The old session is deleted from the store; a fresh one carries a one-time
/// success notice to the login page.
pub async fn logout_handler(Extension(session): Extension<Session>) -> Response {
    if let Ok(Some(user)) = session.current_user().await {
        info!(user_id = user.user_id, "User logged out");
    }

    if let Err(e) = session.destroy().await {
        error!(error = %e, "Failed to destroy session");
    }

    if let Err(e) = FlashState::success(LOGGED_OUT_MESSAGE).save(&session).await {
        warn!(error = %e, "Failed to store logout notice");
    }

    found("/login")
}
