//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - Student account lookup and provisioning

pub mod pg_user_repository;

pub use pg_user_repository::PgUserRepository;
