//! Data Transfer Objects for JSON endpoints.

pub mod health;
