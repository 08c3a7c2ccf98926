//! Repository for the `users` table.

use sqlx::PgConnection;
use taskboard_core::models::User;
use taskboard_core::types::EntityId;

use crate::models::UserRow;

const COLUMNS: &str = "id, name, password_hash, created_at";

pub struct UserRepo;

impl UserRepo {
    /// Insert a new user. A taken name fails with a unique violation on
    /// `uq_users_name`.
    pub async fn create(conn: &mut PgConnection, user: &User) -> Result<UserRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (id, name, password_hash) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserRow>(&query)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.password_hash)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(
        conn: &mut PgConnection,
        id: EntityId,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    pub async fn find_by_name(
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<Option<UserRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE name = $1");
        sqlx::query_as::<_, UserRow>(&query)
            .bind(name)
            .fetch_optional(conn)
            .await
    }
}
