//! Session storage for browser sessions.
//!
//! Provides a [`SessionStore`] trait with two implementations:
//! - [`RedisSessionStore`] - Production Redis-backed store
//! - [`MemorySessionStore`] - Process-local store for development and tests
//!
//! Sessions are addressed by an opaque [`SessionToken`] taken from the
//! session cookie.

mod memory_store;
mod redis_store;
mod service;
mod token;

pub use memory_store::MemorySessionStore;
pub use redis_store::RedisSessionStore;
pub use service::{SessionError, SessionResult, SessionStore};
pub use token::SessionToken;

#[cfg(test)]
pub use service::MockSessionStore;
