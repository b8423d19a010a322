//! Opaque session tokens carried in the session cookie.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use std::fmt;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_BYTES: usize = 32;
/// Length of a base64url (unpadded) encoding of [`TOKEN_BYTES`].
const TOKEN_LEN: usize = 43;

/// A random 256-bit session identifier, encoded as unpadded base64url.
///
/// The raw token only ever lives in the client's cookie and in memory;
/// persistent stores key sessions by [`SessionToken::storage_key`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generates a fresh token from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Parses a token presented by a client.
    ///
    /// Returns `None` for anything that is not exactly 32 bytes of base64url,
    /// so that a forged or truncated cookie is replaced instead of adopted.
    pub fn parse(value: &str) -> Option<Self> {
        if value.len() != TOKEN_LEN {
            return None;
        }

        let decoded = URL_SAFE_NO_PAD.decode(value).ok()?;
        (decoded.len() == TOKEN_BYTES).then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives the key a backing store files this session under.
    ///
    /// Returns a 64-character lowercase hex HMAC-SHA256 of the token keyed by
    /// `secret`, so a dump of the store cannot be replayed as cookies.
    pub fn storage_key(&self, secret: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC accepts any key length");
        mac.update(self.0.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(6).collect();
        write!(f, "SessionToken({prefix}…)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_format() {
        let token = SessionToken::generate();
        assert_eq!(token.as_str().len(), TOKEN_LEN);
        assert!(SessionToken::parse(token.as_str()).is_some());
    }

    #[test]
    fn test_generate_unique() {
        let a = SessionToken::generate();
        let b = SessionToken::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(SessionToken::parse("").is_none());
        assert!(SessionToken::parse("short").is_none());
        assert!(SessionToken::parse(&"!".repeat(TOKEN_LEN)).is_none());
        assert!(SessionToken::parse(&"A".repeat(TOKEN_LEN + 1)).is_none());
    }

    #[test]
    fn test_parse_round_trips_value() {
        let token = SessionToken::generate();
        let parsed = SessionToken::parse(token.as_str()).unwrap();
        assert_eq!(parsed, token);
    }

    #[test]
    fn test_storage_key_depends_on_secret() {
        let token = SessionToken::generate();

        let k1 = token.storage_key(b"secret-a");
        let k2 = token.storage_key(b"secret-a");
        let k3 = token.storage_key(b"secret-b");

        assert_eq!(k1, k2);
        assert_ne!(k1, k3);
        assert_eq!(k1.len(), 64);
        assert!(!k1.contains(token.as_str()));
    }

    #[test]
    fn test_debug_does_not_print_full_token() {
        let token = SessionToken::generate();
        let rendered = format!("{:?}", token);
        assert!(!rendered.contains(token.as_str()));
    }
}
