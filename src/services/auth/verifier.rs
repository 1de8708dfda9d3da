use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Errors returned by access-token verification + claim validation.
// The gate collapses all of these into one client-facing failure.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("jwt verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("empty '{0}' claim")]
    EmptyClaim(&'static str),
}

/// Access token (JWT) claims.
///
/// NOTE:
/// - `userId` is the subject; it is opaque here and only used for the identity lookup.
/// - `exp` is required and checked by `jsonwebtoken::Validation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(rename = "userId")]
    pub user_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    pub exp: u64,
}

/// Keyed credential verification.
///
/// Must be a pure function of `(token, key)`: no I/O, no caching.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, token: &str, key: &str) -> Result<AccessClaims, VerifyError>;
}

/// HS256 (shared secret) access-token verifier.
#[derive(Debug, Clone)]
pub struct Hs256Verifier {
    validation: Validation,
}

impl Hs256Verifier {
    pub fn new(leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;
        // tokens are not audience-scoped
        validation.validate_aud = false;

        Self { validation }
    }
}

impl Default for Hs256Verifier {
    fn default() -> Self {
        Self::new(0)
    }
}

impl CredentialVerifier for Hs256Verifier {
    /// `jsonwebtoken::Validation` checks:
    /// - signature (HS256 only; `alg` in the header must match)
    /// - `exp` presence and expiry (with leeway)
    ///
    /// This method additionally requires a non-empty `userId`.
    fn verify(&self, token: &str, key: &str) -> Result<AccessClaims, VerifyError> {
        let decoding_key = DecodingKey::from_secret(key.as_bytes());
        let data = jsonwebtoken::decode::<AccessClaims>(token, &decoding_key, &self.validation)?;

        if data.claims.user_id.trim().is_empty() {
            return Err(VerifyError::EmptyClaim("userId"));
        }

        Ok(data.claims)
    }
}
