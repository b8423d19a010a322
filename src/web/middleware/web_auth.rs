//! Session-based authentication middleware for protected pages.

use axum::{Extension, extract::Request, middleware::Next, response::Response};
use tracing::error;

use crate::web::handlers::found;
use crate::web::session::Session;

/// Lets signed-in visitors through and sends everyone else to `/login`.
///
/// # Authentication Flow
///
/// 1. Read the identity from the request's [`Session`]
/// 2. On success, insert the [`crate::domain::entities::SessionUser`] into
///    request extensions and continue
/// 3. When anonymous, redirect to `/login` with `302 Found`
///
/// Must run inside [`super::session::layer`]. A session store failure counts
/// as anonymous.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::web::middleware::web_auth;
///
/// let protected = Router::new()
///     .route("/dashboard", get(dashboard_handler))
///     .route_layer(middleware::from_fn(web_auth::layer));
/// ```
pub async fn layer(Extension(session): Extension<Session>, mut req: Request, next: Next) -> Response {
    match session.current_user().await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Ok(None) => found("/login"),
        Err(e) => {
            error!(error = %e, "Failed to read session identity");
            found("/login")
        }
    }
}
