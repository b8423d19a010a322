//! Repository trait for student account lookup.

use crate::domain::entities::{NewUser, UserRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the `student` table.
///
/// The login flow only reads through [`UserRepository::find_by_email`];
/// `create` and `list` back the admin CLI.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_user.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds accounts whose email exactly equals `email`.
    ///
    /// Returns every match (at most two) so callers can tell "exactly one"
    /// apart from "ambiguous".
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_email(&self, email: &str) -> Result<Vec<UserRecord>, AppError>;

    /// Inserts a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_user: &NewUser) -> Result<UserRecord, AppError>;

    /// Lists all accounts ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self) -> Result<Vec<UserRecord>, AppError>;

    /// Round-trips a trivial query to check connectivity.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the database is unreachable.
    async fn ping(&self) -> Result<(), AppError>;
}
