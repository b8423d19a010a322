//! Credential checking for the login form.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::credentials::{Credentials, ValidationError};
use crate::domain::entities::UserRecord;
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::utils::password;

/// Shown for both "no such account" and "wrong password".
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password.";

/// Shown for any store or runtime failure. Detail goes to the log only.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Why a login attempt did not succeed.
///
/// All variants end up in the same user-visible error list; only the log
/// distinguishes them.
#[derive(Debug, Error)]
pub enum LoginError {
    /// One or more form rules failed. Authentication was not attempted.
    #[error("validation failed: {0:?}")]
    Validation(Vec<ValidationError>),

    /// No account matched, or the password did not verify.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The user store or the hashing task failed.
    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl LoginError {
    /// Messages to render on the login page, in display order.
    pub fn user_messages(&self) -> Vec<String> {
        match self {
            LoginError::Validation(errors) => errors.iter().map(ToString::to_string).collect(),
            LoginError::InvalidCredentials => vec![INVALID_CREDENTIALS_MESSAGE.to_string()],
            LoginError::Infrastructure(_) => vec![UNEXPECTED_ERROR_MESSAGE.to_string()],
        }
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            LoginError::Validation(_) => "rejected",
            LoginError::InvalidCredentials => "invalid",
            LoginError::Infrastructure(_) => "error",
        }
    }
}

impl From<AppError> for LoginError {
    fn from(e: AppError) -> Self {
        LoginError::Infrastructure(e.to_string())
    }
}

/// Service that validates credentials and authenticates them against the
/// `student` table.
pub struct LoginService {
    users: Arc<dyn UserRepository>,
}

impl LoginService {
    /// Creates a new login service.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Runs the validate -> look up -> verify chain.
    ///
    /// # Flow
    ///
    /// 1. Validate all form rules; any failure returns [`LoginError::Validation`]
    ///    without touching the store
    /// 2. Look up accounts by the escaped, trimmed email
    /// 3. Exactly one match: verify the password against its stored hash
    /// 4. Zero or several matches, or a mismatch: [`LoginError::InvalidCredentials`]
    ///
    /// # Errors
    ///
    /// Returns [`LoginError::Infrastructure`] if the lookup or the hashing task fails.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<UserRecord, LoginError> {
        let errors = credentials.validate();
        if !errors.is_empty() {
            return Err(LoginError::Validation(errors));
        }

        let mut matches = self.users.find_by_email(credentials.lookup_email()).await?;

        if matches.len() != 1 {
            if matches.len() > 1 {
                tracing::warn!(
                    email = credentials.lookup_email(),
                    "Multiple accounts share one email"
                );
            }
            run_blocking_verify(credentials.password().to_string(), None).await?;
            return Err(LoginError::InvalidCredentials);
        }

        let user = matches.remove(0);
        let verified = run_blocking_verify(
            credentials.password().to_string(),
            Some(user.password_hash.clone()),
        )
        .await?;

        if verified {
            Ok(user)
        } else {
            Err(LoginError::InvalidCredentials)
        }
    }
}

/// Runs Argon2 verification off the async executor.
///
/// With no stored hash, verifies against a throwaway hash so that unknown
/// emails take as long as wrong passwords.
async fn run_blocking_verify(
    password: String,
    stored_hash: Option<String>,
) -> Result<bool, LoginError> {
    tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => password::verify_password(&password, &hash),
        None => password::verify_dummy(&password),
    })
    .await
    .map_err(|e| LoginError::Infrastructure(format!("password verification task failed: {e}")))
}
