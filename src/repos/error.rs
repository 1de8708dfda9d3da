/**
 * Responsibility
 * - identity store が上位に伝える意味の定義
 * - "見つからない" はエラーではなく `Ok(None)` で返す
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("identity store unavailable: {0}")]
    Unavailable(String),
}
