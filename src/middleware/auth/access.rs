//! Bearer 認証ゲートを axum middleware として適用する → AuthCtx を extensions に入れる
//!
//! 検証そのもの（抽出 → secret 確認 → JWT 検証 → identity 解決）は
//! `services::auth::AuthGate` が行う。ここは配線と拒否レスポンスのみ。

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AuthError;
use crate::state::AppState;

/// 認証が必要なルート群に gate を掛ける。
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/me", get(me));
/// let protected = middleware::auth::access::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    tracing::debug!(method = %req.method(), uri = %req.uri(), "authenticating request");

    let auth_ctx = state.gate.authenticate(req.headers()).await.inspect_err(|err| {
        tracing::info!(
            method = %req.method(),
            uri = %req.uri(),
            reason = ?err,
            status = err.status().as_u16(),
            "request rejected by auth gate"
        );
    })?;

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}
