/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - /health は公開、/me は認証ゲート配下
 */
use axum::{Router, routing::get};

use crate::middleware::auth::access;
use crate::state::AppState;

use crate::api::v1::handlers::{health::health, me::me};

pub fn routes(state: AppState) -> Router<AppState> {
    let protected = access::apply(Router::new().route("/me", get(me)), state);

    Router::new()
        .route("/health", get(health))
        .merge(protected)
}
