/*
 * Responsibility
 * - GET /me (認証必須)
 * - middleware が載せた AuthCtx をそのまま返す
 */
use axum::Json;

use crate::api::v1::{dto::me::MeResponse, extractors::AuthCtxExtractor};

pub async fn me(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<MeResponse> {
    Json(MeResponse::from(ctx.identity))
}
