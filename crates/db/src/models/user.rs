use sqlx::FromRow;
use taskboard_core::models::User;
use taskboard_core::types::{EntityId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: EntityId,
    pub name: String,
    pub password_hash: String,
    pub created_at: Timestamp,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            password_hash: row.password_hash,
        }
    }
}
