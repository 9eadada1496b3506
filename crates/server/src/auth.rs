//! Signed identity tokens.
//!
//! A token is `base64url(claims JSON) + "." + base64url(HMAC-SHA256)`, where
//! the MAC is computed over the encoded claims with the configured secret.
//! Tokens are valid for 24 hours from issuance and are stateless: there is no
//! refresh and no revocation list, so a leaked token stays usable until it
//! expires.
//!
//! Verification confirms signature and expiry only; it does not check that
//! the embedded user still exists.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fmt;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Token lifetime from issuance. Expiry is absolute and non-renewable.
const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token is required")]
    Missing,

    #[error("invalid token format")]
    InvalidFormat,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token decode error: {0}")]
    Decode(String),

    #[error("token expired")]
    Expired,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    user_id: i32,
    iat: i64,
    exp: i64,
}

/// Issues and verifies the signed tokens carried in request bodies.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenSigner([REDACTED])")
    }
}

impl TokenSigner {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    fn mac(&self, payload_b64: &str) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size");
        mac.update(payload_b64.as_bytes());
        mac
    }

    /// Issue a token for `user_id`, expiring 24 hours from now.
    pub fn issue(&self, user_id: i32) -> String {
        self.issue_at(user_id, Utc::now().timestamp())
    }

    fn issue_at(&self, user_id: i32, now: i64) -> String {
        let claims = Claims {
            user_id,
            iat: now,
            exp: now + TOKEN_TTL_SECS,
        };
        let payload_json = serde_json::to_vec(&claims).expect("serialize claims");
        let payload_b64 = URL_SAFE_NO_PAD.encode(&payload_json);

        let signature = self.mac(&payload_b64).finalize().into_bytes();
        let signature_b64 = URL_SAFE_NO_PAD.encode(signature);

        format!("{payload_b64}.{signature_b64}")
    }

    /// Verify a token and return the embedded user id.
    pub fn verify(&self, token: &str) -> Result<i32, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    fn verify_at(&self, token: &str, now: i64) -> Result<i32, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Missing);
        }

        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 2 {
            return Err(AuthError::InvalidFormat);
        }
        let (payload_b64, signature_b64) = (parts[0], parts[1]);

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|err| AuthError::Decode(err.to_string()))?;
        self.mac(payload_b64)
            .verify_slice(&signature)
            .map_err(|_| AuthError::InvalidSignature)?;

        let payload_json = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|err| AuthError::Decode(err.to_string()))?;
        let claims: Claims = serde_json::from_slice(&payload_json)
            .map_err(|err| AuthError::Decode(err.to_string()))?;

        if claims.exp <= now {
            return Err(AuthError::Expired);
        }
        Ok(claims.user_id)
    }
}
