//! Identity lookup interface used by the authentication gate.
use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::repos::error::StoreError;

/// A resolved principal.
///
/// Fields other than `id` are opaque to the gate and handed to handlers as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub image_url: Option<String>,
}

/// Async lookup of identities by subject id.
///
/// Returns:
/// - `Ok(Some(_))` => record exists
/// - `Ok(None)`    => no such identity (deleted, never existed, unparsable id)
/// - `Err(_)`      => backend failure; callers must not treat this as "not found"
#[async_trait]
pub trait IdentityStore: Send + Sync {
    // Returns the store backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn find_by_id(&self, id: &str) -> Result<Option<Identity>, StoreError>;
}

/// Read-only in-memory store, populated once at construction.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityStore {
    records: HashMap<String, Identity>,
}

impl MemoryIdentityStore {
    pub fn new(records: impl IntoIterator<Item = Identity>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.id.clone(), r)).collect(),
        }
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Identity>, StoreError> {
        Ok(self.records.get(id).cloned())
    }
}
