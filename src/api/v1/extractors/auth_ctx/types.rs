/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - AuthGate が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証や identity 解決は services/auth 側の責務
 * - ここは「型（契約）」として固定化する
 */

use crate::repos::identity_store::Identity;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `identity` は identity store が返したレコードそのもの（加工しない）
/// - `credential` はクライアントが送った生のトークン（`Bearer ` を除いたもの）
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub identity: Identity,
    pub credential: String,
}

impl AuthCtx {
    pub fn new(identity: Identity, credential: impl Into<String>) -> Self {
        Self {
            identity,
            credential: credential.into(),
        }
    }
}
