//! Argon2 password hashing and verification.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$...`), so the parameters
//! and salt travel with the hash and verification needs no extra state.

use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use rand::RngCore;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hash(String),
}

/// Hash verified when no account matches, so a miss costs the same as a
/// wrong password.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("timing-equalizer").ok());

/// Hashes `password` with Argon2id and a random 16-byte salt.
///
/// # Errors
///
/// Returns [`PasswordError::Hash`] if salt encoding or hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let mut salt_bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut salt_bytes);

    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| PasswordError::Hash(e.to_string()))?;

    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?
        .to_string();

    Ok(phc)
}

/// Verifies `password` against a stored PHC hash.
///
/// Comparison is done by the hash scheme's own constant-time routine.
/// A stored value that is not a parseable PHC string never verifies.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is not a valid PHC string");
            false
        }
    }
}

/// Burns one verification against a throwaway hash and always returns false.
pub fn verify_dummy(password: &str) -> bool {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
    false
}
