use sqlx::FromRow;
use taskboard_core::models::List;
use taskboard_core::types::{EntityId, Timestamp};

/// A row from the `lists` table.
#[derive(Debug, Clone, FromRow)]
pub struct ListRow {
    pub id: EntityId,
    pub board_id: EntityId,
    pub user_id: EntityId,
    pub title: String,
    pub before_id: Option<EntityId>,
    pub after_id: Option<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ListRow> for List {
    fn from(row: ListRow) -> Self {
        List {
            id: row.id,
            board_id: row.board_id,
            user_id: row.user_id,
            title: row.title,
            before: row.before_id,
            after: row.after_id,
        }
    }
}
