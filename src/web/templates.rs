//! Server-rendered pages.
//!
//! Template structs are pure data: rendering needs no store, network or
//! request. Askama escapes every interpolated value for HTML.

use askama::Template;
use askama_web::WebTemplate;

use super::flash::FlashState;
use crate::domain::entities::SessionUser;

/// Template for the login page.
///
/// Renders `templates/login.html` with:
/// - An optional one-time success notice
/// - The error list, in order
/// - The email field repopulated from the last attempt
#[derive(Debug, Default, Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub errors: Vec<String>,
    pub email: String,
    pub success_message: Option<String>,
}

impl From<FlashState> for LoginTemplate {
    fn from(flash: FlashState) -> Self {
        Self {
            errors: flash.errors,
            email: flash.form_data.email,
            success_message: flash.success_message,
        }
    }
}

/// Template for the post-login landing page.
#[derive(Debug, Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub user: SessionUser,
}
