//! Submitted login credentials and their validation rules.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;
use validator::ValidateEmail;

use crate::utils::html::escape_html;

/// Raw `application/x-www-form-urlencoded` body of `POST /login`.
///
/// Missing fields deserialize as empty strings so that they surface as
/// validation errors rather than extractor rejections.
#[derive(Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A single failed validation rule.
///
/// The `Display` text is exactly what the login page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email address is required.")]
    EmailRequired,
    #[error("Invalid email format.")]
    InvalidEmailFormat,
    #[error("Password is required.")]
    PasswordRequired,
}

/// Credentials for one login attempt. Lives for a single request.
#[derive(Clone)]
pub struct Credentials {
    email: String,
    lookup_email: String,
    password: String,
}

impl Credentials {
    pub fn new(email: &str, password: impl Into<String>) -> Self {
        let email = email.trim().to_string();
        let lookup_email = escape_html(&email);

        Self {
            email,
            lookup_email,
            password: password.into(),
        }
    }

    /// The trimmed email as the user typed it, used to repopulate the form.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The trimmed, HTML-escaped email that validation and lookup operate on.
    pub fn lookup_email(&self) -> &str {
        &self.lookup_email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Checks every rule and returns the failures in display order.
    ///
    /// The two email rules are mutually exclusive: format is only checked
    /// when the field is non-empty.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.lookup_email.is_empty() {
            errors.push(ValidationError::EmailRequired);
        } else if !is_valid_email(&self.lookup_email) {
            errors.push(ValidationError::InvalidEmailFormat);
        }

        if self.password.is_empty() {
            errors.push(ValidationError::PasswordRequired);
        }

        errors
    }
}

impl From<LoginForm> for Credentials {
    fn from(form: LoginForm) -> Self {
        Self::new(&form.email, form.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Returns true if `email` is a syntactically valid email address whose
/// domain has at least one dot, e.g. `a@b.co` but not `a@b` or `a@localhost`.
pub fn is_valid_email(email: &str) -> bool {
    if !email.validate_email() {
        return false;
    }

    match email.rsplit_once('@') {
        Some((_, domain)) => {
            domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Normalizes an email for storage the same way a login attempt does.
///
/// Returns the value `find_by_email` will later be called with, so an
/// account created from this is always reachable from the form.
pub fn account_email(email: &str) -> Result<String, ValidationError> {
    let credentials = Credentials::new(email, String::new());

    if credentials.lookup_email().is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    if !is_valid_email(credentials.lookup_email()) {
        return Err(ValidationError::InvalidEmailFormat);
    }

    Ok(credentials.lookup_email)
}
