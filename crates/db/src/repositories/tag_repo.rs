//! Repository for the global `tags` catalog.

use sqlx::PgConnection;
use taskboard_core::models::Tag;
use taskboard_core::types::EntityId;

use crate::models::TagRow;

const COLUMNS: &str = "id, name, color, created_at";

pub struct TagRepo;

impl TagRepo {
    pub async fn create(conn: &mut PgConnection, tag: &Tag) -> Result<TagRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (id, name, color) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TagRow>(&query)
            .bind(tag.id)
            .bind(&tag.name)
            .bind(tag.color.as_str())
            .fetch_one(conn)
            .await
    }

    /// Whole catalog, oldest first.
    pub async fn list(conn: &mut PgConnection) -> Result<Vec<TagRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags ORDER BY created_at, name");
        sqlx::query_as::<_, TagRow>(&query).fetch_all(conn).await
    }

    pub async fn find_by_ids(
        conn: &mut PgConnection,
        ids: &[EntityId],
    ) -> Result<Vec<TagRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE id = ANY($1)");
        sqlx::query_as::<_, TagRow>(&query)
            .bind(ids)
            .fetch_all(conn)
            .await
    }

    pub async fn find_by_name(
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<Vec<TagRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE name = $1");
        sqlx::query_as::<_, TagRow>(&query)
            .bind(name)
            .fetch_all(conn)
            .await
    }
}
