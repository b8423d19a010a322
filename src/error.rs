//! Repository error type.
//!
//! Pages never render these directly: the login flow maps them onto
//! [`crate::application::services::LoginError`] and shows a generic message,
//! and the admin CLI prints them.

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A uniqueness constraint rejected the write.
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            let constraint = db.constraint().unwrap_or("unknown");
            return AppError::conflict(format!("Unique constraint violation ({constraint})"));
        }

        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error")
    }
}
