//! One-shot login page state carried across a single request boundary.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::session::{Session, keys};
use crate::infrastructure::session::SessionResult;

/// Form fields echoed back into the login form. The password never is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    pub email: String,
}

/// Errors, form data and an optional success notice for the next render.
///
/// Stored under [`keys::FLASH`] and removed the moment it is read, so it is
/// shown by at most one subsequent page render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashState {
    pub errors: Vec<String>,
    pub form_data: FormData,
    pub success_message: Option<String>,
}

impl FlashState {
    /// State left behind by a failed login attempt.
    pub fn failure(errors: Vec<String>, email: impl Into<String>) -> Self {
        Self {
            errors,
            form_data: FormData {
                email: email.into(),
            },
            success_message: None,
        }
    }

    /// A notice shown once on the next login page.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success_message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.form_data.email.is_empty() && self.success_message.is_none()
    }

    /// Reads and clears the flash slot.
    ///
    /// Store failures are logged and read as an empty state; a broken flash
    /// never blocks the login page.
    pub async fn take(session: &Session) -> FlashState {
        match session.take::<FlashState>(keys::FLASH).await {
            Ok(Some(flash)) => flash,
            Ok(None) => FlashState::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read flash state, rendering without it");
                FlashState::default()
            }
        }
    }

    /// Stores this state for the next request on `session`.
    pub async fn save(&self, session: &Session) -> SessionResult<()> {
        session.insert(keys::FLASH, self).await
    }
}
