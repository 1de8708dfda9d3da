//! Authentication gate: bearer credential → verified claims → resolved identity.
//!
//! The pipeline is strictly linear and every stage returns `Result<_, AuthError>`:
//!
//! 1. extract the credential from `Authorization`
//! 2. check that a verification secret is configured
//! 3. verify the credential
//! 4. resolve the subject through the identity store
//! 5. admit (hand back an `AuthCtx` for the request extensions)
//!
//! A missing credential is reported before a missing secret, so an anonymous
//! client always sees 401 even on a misconfigured server.

use std::sync::Arc;

use axum::http::{HeaderMap, header};
use tracing::{debug, error, warn};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AuthError;
use crate::repos::identity_store::IdentityStore;
use crate::services::auth::verifier::CredentialVerifier;

const BEARER_PREFIX: &str = "Bearer ";

/// Process-wide gate settings, loaded once before serving traffic.
#[derive(Clone, Default)]
pub struct GateConfig {
    jwt_secret: Option<String>,
}

impl std::fmt::Debug for GateConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("GateConfig")
            .field("jwt_secret_configured", &self.jwt_secret.is_some())
            .finish()
    }
}

impl GateConfig {
    pub fn new(jwt_secret: Option<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn jwt_secret(&self) -> Option<&str> {
        self.jwt_secret.as_deref()
    }
}

/// Stateless across requests; cloning shares the read-only config and collaborators.
#[derive(Clone)]
pub struct AuthGate {
    config: Arc<GateConfig>,
    verifier: Arc<dyn CredentialVerifier>,
    store: Arc<dyn IdentityStore>,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("config", &self.config)
            .field("store", &self.store.backend_name())
            .finish()
    }
}

impl AuthGate {
    pub fn new(
        config: GateConfig,
        verifier: Arc<dyn CredentialVerifier>,
        store: Arc<dyn IdentityStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            verifier,
            store,
        }
    }

    /// Run the full pipeline for one request.
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthCtx, AuthError> {
        let token = extract_credential(headers)?;
        let secret = self.secret()?;

        let claims = self.verifier.verify(token, secret).inspect_err(|err| {
            warn!(error = %err, "access token verification failed");
        })?;

        let identity = self
            .store
            .find_by_id(&claims.user_id)
            .await
            .inspect_err(|err| {
                error!(
                    error = ?err,
                    store = self.store.backend_name(),
                    "identity lookup failed"
                );
            })?
            .ok_or_else(|| {
                warn!(user_id = %claims.user_id, "token subject has no identity record");
                AuthError::IdentityNotFound
            })?;

        debug!(user_id = %identity.id, "request authenticated");

        Ok(AuthCtx::new(identity, token))
    }

    fn secret(&self) -> Result<&str, AuthError> {
        self.config.jwt_secret().ok_or_else(|| {
            error!("JWT_SECRET not configured");
            AuthError::ServerMisconfigured
        })
    }
}

/// Pull the raw credential out of `Authorization`.
///
/// The `Bearer ` scheme is stripped when present but not required: a bare token
/// is accepted as-is. An empty token counts as no credential.
pub fn extract_credential(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers.get(header::AUTHORIZATION).ok_or_else(|| {
        debug!("no authorization header");
        AuthError::MissingCredential
    })?;

    let raw = value.to_str().map_err(|_| {
        warn!("authorization header is not visible ascii");
        AuthError::InvalidCredential
    })?;

    let token = raw.strip_prefix(BEARER_PREFIX).unwrap_or(raw);
    if token.is_empty() {
        debug!("empty bearer credential");
        return Err(AuthError::MissingCredential);
    }

    Ok(token)
}
