//! Signed auth tokens.
//!
//! A token is an HS256 [JWT] whose only claim is the note path it unlocks.
//! It carries no expiry; the cookie holding it expires instead.
//!
//! [JWT]: https://www.rfc-editor.org/rfc/rfc7519.html

use crate::error::AppError;
use hmac::{Hmac, Mac};
use jwt::{SignWithKey, VerifyWithKey};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuthClaims {
    path: String,
}

/// Issues and verifies path-bound tokens with a process-wide key.
#[derive(Clone)]
pub struct TokenService {
    key: Hmac<Sha256>,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    /// Build a service keyed with `secret`.
    ///
    /// # Errors
    /// Returns [`AppError::Config`] if the HMAC key cannot be built.
    pub fn new(secret: &[u8]) -> Result<Self, AppError> {
        let key = Hmac::new_from_slice(secret)
            .map_err(|err| AppError::Config(format!("Invalid signing secret: {}", err)))?;
        Ok(Self { key })
    }

    /// Sign a token for `path`.
    ///
    /// # Errors
    /// Returns an error if claim serialization or signing fails.
    pub fn issue(&self, path: &str) -> Result<String, AppError> {
        let claims = AuthClaims {
            path: path.to_string(),
        };
        Ok(claims.sign_with_key(&self.key)?)
    }

    /// Check that `token` is validly signed and bound to exactly `path`.
    ///
    /// Missing, malformed, and mismatched tokens all return `false`.
    pub fn verify(&self, token: Option<&str>, path: &str) -> bool {
        let Some(token) = token.filter(|value| !value.is_empty()) else {
            return false;
        };
        let claims: Result<AuthClaims, jwt::Error> = token.verify_with_key(&self.key);
        match claims {
            Ok(claims) => claims.path == path,
            Err(err) => {
                tracing::debug!("Rejected auth token for '{}': {}", path, err);
                false
            }
        }
    }
}
