//! Authenticated identity carried by a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserRecord;

/// The identity written into the session on a successful login.
///
/// Each field is stored under its own session key (see
/// [`crate::web::session::keys`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: i64,
    pub user_name: String,
    pub user_email: String,
    pub logged_in_at: DateTime<Utc>,
}

impl SessionUser {
    /// Builds the session identity for a freshly authenticated user.
    pub fn from_record(user: &UserRecord) -> Self {
        Self {
            user_id: user.id,
            user_name: user.name.clone(),
            user_email: user.email.clone(),
            logged_in_at: Utc::now(),
        }
    }
}
