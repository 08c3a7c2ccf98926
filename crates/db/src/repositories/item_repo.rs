//! `items` table.

use async_trait::async_trait;
use sqlx::PgConnection;
use taskboard_core::error::CoreError;
use taskboard_core::models::{Item, ItemPatch};
use taskboard_core::types::EntityId;

use crate::models::ItemRow;
use crate::repositories::PgEntity;

const COLUMNS: &str =
    "id, list_id, user_id, title, text, tag_ids, before_id, after_id, created_at, updated_at";

#[async_trait]
impl PgEntity for Item {
    const TABLE: &'static str = "items";
    const PARENT_COLUMN: &'static str = "list_id";
    const COLUMNS: &'static str = COLUMNS;

    type Row = ItemRow;

    fn from_row(row: ItemRow) -> Result<Self, CoreError> {
        Ok(row.into())
    }

    async fn insert(conn: &mut PgConnection, item: &Item) -> Result<ItemRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO items (id, list_id, user_id, title, text, tag_ids, before_id, after_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ItemRow>(&query)
            .bind(item.id)
            .bind(item.list_id)
            .bind(item.user_id)
            .bind(&item.title)
            .bind(&item.text)
            .bind(&item.tags)
            .bind(item.before)
            .bind(item.after)
            .fetch_one(conn)
            .await
    }

    async fn update_fields(
        conn: &mut PgConnection,
        id: EntityId,
        owner: EntityId,
        patch: &ItemPatch,
    ) -> Result<Option<ItemRow>, sqlx::Error> {
        let query = format!(
            "UPDATE items SET
                title = COALESCE($3, title),
                text = CASE WHEN $4 THEN $5 ELSE text END,
                tag_ids = COALESCE($6, tag_ids),
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ItemRow>(&query)
            .bind(id)
            .bind(owner)
            .bind(&patch.title)
            .bind(patch.text.is_some())
            .bind(patch.text.clone().flatten())
            .bind(&patch.tags)
            .fetch_optional(conn)
            .await
    }
}
