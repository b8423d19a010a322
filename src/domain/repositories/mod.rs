//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access; concrete implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are
//! auto-generated via `mockall` for testing.
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - Student account lookup and provisioning

pub mod user_repository;

pub use user_repository::UserRepository;

#[cfg(test)]
pub use user_repository::MockUserRepository;
