/*
 * Responsibility
 * - tracing / panic hook 初期化
 * - Config読み込み → 依存生成 (identity store, verifier, AuthGate) → Router 組み立て
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, HttpLimits};
use crate::repos::{IdentityStore, MemoryIdentityStore, PgIdentityStore};
use crate::services::auth::{AuthGate, GateConfig, Hs256Verifier};
use crate::{api, middleware, state::AppState};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,bearer_gate=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing; stderr may be hidden depending on the launcher.
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, config.http_limits);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_state(config: &Config) -> Result<AppState> {
    let store: Arc<dyn IdentityStore> = match &config.database_url {
        Some(url) => Arc::new(PgIdentityStore::connect_lazy(url)?),
        None => {
            tracing::warn!("DATABASE_URL not set; using an empty in-memory identity store");
            Arc::new(MemoryIdentityStore::default())
        }
    };

    // Not fatal: the gate answers 500 per request until a secret is provided.
    if config.jwt_secret.is_none() {
        tracing::error!("JWT_SECRET not configured; protected routes will fail");
    }

    let gate = AuthGate::new(
        GateConfig::new(config.jwt_secret.clone()),
        Arc::new(Hs256Verifier::new(config.jwt_leeway_seconds)),
        store,
    );

    tracing::info!(gate = ?gate, "auth gate ready");

    Ok(AppState::new(gate))
}

fn build_router(state: AppState, limits: HttpLimits) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    middleware::http::apply(router, limits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use crate::testing::{SECRET, alice, valid_token};

    fn app(secret: Option<&str>, store: MemoryIdentityStore) -> Router {
        let gate = AuthGate::new(
            GateConfig::new(secret.map(str::to_owned)),
            Arc::new(Hs256Verifier::default()),
            Arc::new(store),
        );
        build_router(AppState::new(gate), HttpLimits::default())
    }

    async fn get(
        app: Router,
        path: &str,
        authorization: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let mut req = Request::builder().uri(path);
        if let Some(value) = authorization {
            req = req.header(header::AUTHORIZATION, value);
        }

        let res = app
            .oneshot(req.body(Body::empty()).expect("request"))
            .await
            .expect("infallible");

        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = app(None, MemoryIdentityStore::default());

        let (status, body) = get(app, "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn absent_token_is_rejected() {
        let app = app(Some(SECRET), MemoryIdentityStore::new([alice()]));

        let (status, body) = get(app, "/api/v1/me", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({ "error": "Authentication required" }));
    }

    #[tokio::test]
    async fn bad_signature_is_rejected_without_detail() {
        let app = app(Some(SECRET), MemoryIdentityStore::new([alice()]));

        let (status, body) = get(app, "/api/v1/me", Some("Bearer badsig")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({ "error": "Invalid authentication token" }));
    }

    #[tokio::test]
    async fn deleted_user_is_rejected() {
        let app = app(Some(SECRET), MemoryIdentityStore::default());
        let auth = format!("Bearer {}", valid_token("u1"));

        let (status, body) = get(app, "/api/v1/me", Some(&auth)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({ "error": "User not found" }));
    }

    #[tokio::test]
    async fn missing_secret_is_a_server_error() {
        let app = app(None, MemoryIdentityStore::new([alice()]));
        let auth = format!("Bearer {}", valid_token("u1"));

        let (status, body) = get(app, "/api/v1/me", Some(&auth)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": "Server configuration error" }));
    }

    #[tokio::test]
    async fn admitted_request_sees_the_stored_identity() {
        let app = app(Some(SECRET), MemoryIdentityStore::new([alice()]));
        let auth = format!("Bearer {}", valid_token("u1"));

        let (status, body) = get(app, "/api/v1/me", Some(&auth)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({
                "user": { "id": "u1", "username": "alice", "imageUrl": null }
            })
        );
    }
}
