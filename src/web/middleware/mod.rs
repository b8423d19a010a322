//! Browser-facing middleware.
//!
//! - [`session`] binds a session to each request and manages its cookie
//! - [`web_auth`] guards pages that need a signed-in user

pub mod session;
pub mod web_auth;
