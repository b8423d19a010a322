//! Dashboard page handler.

use axum::Extension;

use crate::domain::entities::SessionUser;
use crate::web::templates::DashboardTemplate;

/// Renders the post-login landing page.
///
/// # Endpoint
///
/// `GET /dashboard`
///
/// # Authentication
///
/// Guarded by [`crate::web::middleware::web_auth`], which resolves the
/// session identity and redirects anonymous visitors to `/login`.
pub async fn dashboard_handler(Extension(user): Extension<SessionUser>) -> DashboardTemplate {
    DashboardTemplate { user }
}
