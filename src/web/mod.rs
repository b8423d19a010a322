//! Browser-facing layer: the login form, its session and its pages.
//!
//! Uses Askama templates for server-side rendering.
//!
//! # Modules
//!
//! - [`flash`] - One-shot state carried to the next render
//! - [`handlers`] - Page handlers
//! - [`middleware`] - Session and authentication middleware
//! - [`routes`] - Route configuration
//! - [`session`] - Per-request session handle and cookie attributes
//! - [`templates`] - Askama page templates

pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod templates;

#[cfg(test)]
pub(crate) mod test_support;
