//! HTML handlers for the login flow.

mod dashboard;
mod login;
mod logout;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

pub use dashboard::dashboard_handler;
pub use login::{POST_LOGIN_PATH, login_page_handler, login_submit_handler};
pub use logout::{LOGGED_OUT_MESSAGE, logout_handler};

/// `302 Found` to `location`.
///
/// Used instead of `Redirect::to`, which answers `303 See Other`.
pub fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Sends visitors of `/` to the login page.
pub async fn index_handler() -> Response {
    found("/login")
}
