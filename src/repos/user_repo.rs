/*
 * Responsibility
 * - users テーブルを IdentityStore として引く SQLx 実装
 * - PgPool を受け取り id 検索のみ提供 (書き込みは行わない)
 * - DB エラーは StoreError として返す (not found とは区別する)
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool, postgres::PgPoolOptions};
use uuid::Uuid;

use crate::repos::error::StoreError;
use crate::repos::identity_store::{Identity, IdentityStore};

#[derive(Debug, FromRow)]
pub struct UserRow {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    #[sqlx(rename = "userName")]
    pub user_name: String,
    #[sqlx(rename = "imageUrl")]
    pub image_url: Option<String>,
}

impl From<UserRow> for Identity {
    fn from(row: UserRow) -> Self {
        Identity {
            id: row.id.to_string(),
            username: row.user_name,
            image_url: row.image_url,
        }
    }
}

pub async fn get(db: &PgPool, user_id: Uuid) -> Result<Option<UserRow>, StoreError> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT "userId", "userName", "imageUrl"
        FROM users
        WHERE "userId" = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

#[derive(Debug, Clone)]
pub struct PgIdentityStore {
    db: PgPool,
}

impl PgIdentityStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // Connections are opened on first lookup, so a down database shows up as
    // StoreError per request instead of a startup failure.
    pub fn connect_lazy(database_url: &str) -> Result<Self, StoreError> {
        let db = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy(database_url)?;

        Ok(Self::new(db))
    }
}

#[async_trait]
impl IdentityStore for PgIdentityStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Identity>, StoreError> {
        // users are keyed by UUID; any other subject cannot exist here
        let Ok(user_id) = Uuid::parse_str(id) else {
            tracing::debug!(subject = %id, "subject is not a uuid");
            return Ok(None);
        };

        let row = get(&self.db, user_id).await?;

        Ok(row.map(Identity::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_converts_to_identity_without_touching_attributes() {
        let id = Uuid::new_v4();
        let row = UserRow {
            id,
            user_name: "alice".into(),
            image_url: None,
        };

        let identity = Identity::from(row);
        assert_eq!(identity.id, id.to_string());
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.image_url, None);
    }

    #[tokio::test]
    async fn non_uuid_subject_is_not_found_without_querying() {
        // lazy pool never connects unless a query is issued
        let store = PgIdentityStore::connect_lazy("postgres://unused@127.0.0.1:1/none")
            .expect("lazy pool");

        let found = store.find_by_id("u1").await.expect("lookup");
        assert!(found.is_none());
    }
}
