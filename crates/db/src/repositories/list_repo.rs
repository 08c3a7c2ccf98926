//! `lists` table.

use async_trait::async_trait;
use sqlx::PgConnection;
use taskboard_core::error::CoreError;
use taskboard_core::models::{List, ListPatch};
use taskboard_core::types::EntityId;

use crate::models::ListRow;
use crate::repositories::PgEntity;

const COLUMNS: &str = "id, board_id, user_id, title, before_id, after_id, created_at, updated_at";

#[async_trait]
impl PgEntity for List {
    const TABLE: &'static str = "lists";
    const PARENT_COLUMN: &'static str = "board_id";
    const COLUMNS: &'static str = COLUMNS;

    type Row = ListRow;

    fn from_row(row: ListRow) -> Result<Self, CoreError> {
        Ok(row.into())
    }

    async fn insert(conn: &mut PgConnection, list: &List) -> Result<ListRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO lists (id, board_id, user_id, title, before_id, after_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ListRow>(&query)
            .bind(list.id)
            .bind(list.board_id)
            .bind(list.user_id)
            .bind(&list.title)
            .bind(list.before)
            .bind(list.after)
            .fetch_one(conn)
            .await
    }

    async fn update_fields(
        conn: &mut PgConnection,
        id: EntityId,
        owner: EntityId,
        patch: &ListPatch,
    ) -> Result<Option<ListRow>, sqlx::Error> {
        let query = format!(
            "UPDATE lists SET title = COALESCE($3, title), updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ListRow>(&query)
            .bind(id)
            .bind(owner)
            .bind(&patch.title)
            .fetch_optional(conn)
            .await
    }
}
