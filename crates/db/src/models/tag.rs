use sqlx::FromRow;
use taskboard_core::error::{CoreError, ErrorContext};
use taskboard_core::models::Tag;
use taskboard_core::types::{EntityId, Timestamp};

use crate::models::stored_color;

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow)]
pub struct TagRow {
    pub id: EntityId,
    pub name: String,
    pub color: String,
    pub created_at: Timestamp,
}

impl TryFrom<TagRow> for Tag {
    type Error = CoreError;

    fn try_from(row: TagRow) -> Result<Self, Self::Error> {
        let color = stored_color(&row.color, ErrorContext::new("tag", "load tag").id(row.id))?;
        Ok(Tag {
            id: row.id,
            name: row.name,
            color,
        })
    }
}
