use sqlx::FromRow;
use taskboard_core::models::Item;
use taskboard_core::types::{EntityId, Timestamp};

/// A row from the `items` table.
#[derive(Debug, Clone, FromRow)]
pub struct ItemRow {
    pub id: EntityId,
    pub list_id: EntityId,
    pub user_id: EntityId,
    pub title: String,
    pub text: Option<String>,
    /// Ordered tag references. Existence is checked by the item manager.
    pub tag_ids: Vec<EntityId>,
    pub before_id: Option<EntityId>,
    pub after_id: Option<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            list_id: row.list_id,
            user_id: row.user_id,
            title: row.title,
            text: row.text,
            tags: row.tag_ids,
            before: row.before_id,
            after: row.after_id,
        }
    }
}
