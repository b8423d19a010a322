//! Student account entity.

use std::fmt;

/// A student account as stored in the `student` table.
///
/// `password_hash` holds a PHC-format one-way hash; the plaintext password is
/// never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl UserRecord {
    /// Creates a new UserRecord instance.
    pub fn new(id: i64, name: String, email: String, password_hash: String) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
        }
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Input data for provisioning a new student account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}
