//! `boards` table.

use async_trait::async_trait;
use sqlx::PgConnection;
use taskboard_core::error::CoreError;
use taskboard_core::models::{Board, BoardPatch, Color};
use taskboard_core::types::EntityId;

use crate::models::BoardRow;
use crate::repositories::PgEntity;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, title, text, color, before_id, after_id, created_at, updated_at";

#[async_trait]
impl PgEntity for Board {
    const TABLE: &'static str = "boards";
    // Boards are ordered per owner.
    const PARENT_COLUMN: &'static str = "user_id";
    const COLUMNS: &'static str = COLUMNS;

    type Row = BoardRow;

    fn from_row(row: BoardRow) -> Result<Self, CoreError> {
        Board::try_from(row)
    }

    async fn insert(conn: &mut PgConnection, board: &Board) -> Result<BoardRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO boards (id, user_id, title, text, color, before_id, after_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BoardRow>(&query)
            .bind(board.id)
            .bind(board.user_id)
            .bind(&board.title)
            .bind(&board.text)
            .bind(board.color.as_str())
            .bind(board.before)
            .bind(board.after)
            .fetch_one(conn)
            .await
    }

    async fn update_fields(
        conn: &mut PgConnection,
        id: EntityId,
        owner: EntityId,
        patch: &BoardPatch,
    ) -> Result<Option<BoardRow>, sqlx::Error> {
        let query = format!(
            "UPDATE boards SET
                title = COALESCE($3, title),
                text = CASE WHEN $4 THEN $5 ELSE text END,
                color = COALESCE($6, color),
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BoardRow>(&query)
            .bind(id)
            .bind(owner)
            .bind(&patch.title)
            .bind(patch.text.is_some())
            .bind(patch.text.clone().flatten())
            .bind(patch.color.map(Color::as_str))
            .fetch_optional(conn)
            .await
    }
}
