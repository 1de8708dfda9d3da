/*
 * Responsibility
 * - GET /me の response DTO
 * - credential は返さない
 */
use serde::Serialize;

use crate::repos::identity_store::Identity;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: Identity,
}

impl From<Identity> for MeResponse {
    fn from(user: Identity) -> Self {
        Self { user }
    }
}
