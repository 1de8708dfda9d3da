/*
 * Responsibility
 * - 認証ゲートの拒否理由 (AuthError) の定義
 * - IntoResponse 実装 (HTTP status / `{ "error": <message> }`)
 * - verifier / identity store のエラーを AuthError に分類する唯一の変換点
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::StoreError;
use crate::services::auth::verifier::VerifyError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Why the gate refused a request.
///
/// The `Display` text is the client-visible message, so it must stay stable and
/// must never carry verification detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authentication required")]
    MissingCredential,
    #[error("Server configuration error")]
    ServerMisconfigured,
    #[error("Invalid authentication token")]
    InvalidCredential,
    #[error("User not found")]
    IdentityNotFound,
    #[error("Authentication service unavailable")]
    IdentityStoreUnavailable,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingCredential
            | AuthError::InvalidCredential
            | AuthError::IdentityNotFound => StatusCode::UNAUTHORIZED,
            AuthError::ServerMisconfigured => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::IdentityStoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<VerifyError> for AuthError {
    fn from(_: VerifyError) -> Self {
        // expired / malformed / bad signature are indistinguishable to the client
        AuthError::InvalidCredential
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Db(_) | StoreError::Unavailable(_) => AuthError::IdentityStoreUnavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: AuthError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn client_failures_render_as_401_with_stable_messages() {
        let cases = [
            (AuthError::MissingCredential, "Authentication required"),
            (AuthError::InvalidCredential, "Invalid authentication token"),
            (AuthError::IdentityNotFound, "User not found"),
        ];

        for (err, message) in cases {
            let (status, body) = body_json(err).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, serde_json::json!({ "error": message }));
        }
    }

    #[tokio::test]
    async fn misconfiguration_is_a_server_error() {
        let (status, body) = body_json(AuthError::ServerMisconfigured).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Server configuration error");
    }

    #[tokio::test]
    async fn store_outage_is_not_reported_as_missing_user() {
        let (status, body) = body_json(AuthError::IdentityStoreUnavailable).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_ne!(body["error"], "User not found");
    }

    #[test]
    fn verification_errors_collapse_to_invalid_credential() {
        let err = VerifyError::EmptyClaim("userId");
        assert_eq!(AuthError::from(err), AuthError::InvalidCredential);
    }

    #[test]
    fn store_errors_map_to_unavailable() {
        let err = StoreError::Unavailable("connection refused".into());
        assert_eq!(AuthError::from(err), AuthError::IdentityStoreUnavailable);
    }
}
