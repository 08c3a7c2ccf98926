use sqlx::FromRow;
use taskboard_core::error::{CoreError, ErrorContext};
use taskboard_core::models::Board;
use taskboard_core::types::{EntityId, Timestamp};

use crate::models::stored_color;

/// A row from the `boards` table.
#[derive(Debug, Clone, FromRow)]
pub struct BoardRow {
    pub id: EntityId,
    pub user_id: EntityId,
    pub title: String,
    pub text: Option<String>,
    pub color: String,
    pub before_id: Option<EntityId>,
    pub after_id: Option<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<BoardRow> for Board {
    type Error = CoreError;

    fn try_from(row: BoardRow) -> Result<Self, Self::Error> {
        let ctx = ErrorContext::new("board", "load board")
            .id(row.id)
            .owner(row.user_id);
        Ok(Board {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            text: row.text,
            color: stored_color(&row.color, ctx)?,
            before: row.before_id,
            after: row.after_id,
        })
    }
}
