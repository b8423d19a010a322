//! Utility functions shared across layers.
//!
//! - [`html`] - HTML entity escaping
//! - [`password`] - Argon2 password hashing and verification

pub mod html;
pub mod password;
