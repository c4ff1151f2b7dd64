//! Password hashing and share-token digests.

use crate::constants::SHARE_TOKEN_LEN;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Salt and hash a plaintext password for storage.
///
/// # Returns
/// Lowercase hex SHA-256 of `salt || plaintext`.
pub fn hash_password(salt: &str, plaintext: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(plaintext.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare a submitted password against a stored hash.
pub fn password_matches(salt: &str, plaintext: &str, stored_hash: &str) -> bool {
    let candidate = hash_password(salt, plaintext);
    candidate.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}

/// Stable public identifier for a note path.
///
/// # Returns
/// The first [`SHARE_TOKEN_LEN`] hex characters of the BLAKE3 digest of
/// `salt:path`.
pub fn share_token(salt: &str, path: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(path.as_bytes());
    let mut token = hasher.finalize().to_hex().to_string();
    token.truncate(SHARE_TOKEN_LEN);
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_and_deterministic() {
        let first = hash_password("salt", "hunter2");
        assert_eq!(first, hash_password("salt", "hunter2"));
        assert_ne!(first, hash_password("pepper", "hunter2"));
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn password_matches_only_exact_plaintext() {
        let stored = hash_password("salt", "hunter2");
        assert!(password_matches("salt", "hunter2", &stored));
        assert!(!password_matches("salt", "hunter3", &stored));
        assert!(!password_matches("salt", "", &stored));
        assert!(!password_matches("salt", "hunter2", ""));
    }

    #[test]
    fn share_token_is_short_and_path_specific() {
        let token = share_token("salt", "notes1");
        assert_eq!(token.len(), SHARE_TOKEN_LEN);
        assert_eq!(token, share_token("salt", "notes1"));
        assert_ne!(token, share_token("salt", "notes2"));
        assert_ne!(token, share_token("other", "notes1"));
    }
}
