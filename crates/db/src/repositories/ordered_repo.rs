//! Shared queries for the three ordered tables.
//!
//! The tables differ only in their name, parent column and payload columns,
//! so the chain bookkeeping is written once against [`PgEntity`].

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgConnection};
use taskboard_core::error::CoreError;
use taskboard_core::ordering::{LinkPatch, Ordered};
use taskboard_core::store::{Endpoint, ScopeQuery};
use taskboard_core::types::{EntityId, Scope};

/// An ordered entity stored in its own table.
///
/// Every table has `id`, `user_id`, `before_id` and `after_id`; the parent
/// scope lives in `PARENT_COLUMN`.
#[async_trait]
pub trait PgEntity: Ordered {
    const TABLE: &'static str;
    const PARENT_COLUMN: &'static str;
    const COLUMNS: &'static str;

    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;

    fn from_row(row: Self::Row) -> Result<Self, CoreError>;

    async fn insert(conn: &mut PgConnection, entity: &Self) -> Result<Self::Row, sqlx::Error>;

    /// Apply non-positional fields. `None` when no row matches `(id, owner)`.
    async fn update_fields(
        conn: &mut PgConnection,
        id: EntityId,
        owner: EntityId,
        patch: &Self::Patch,
    ) -> Result<Option<Self::Row>, sqlx::Error>;
}

/// Chain bookkeeping queries shared by boards, lists and items.
pub struct OrderedRepo;

impl OrderedRepo {
    pub async fn find_by_id<E: PgEntity>(
        conn: &mut PgConnection,
        id: EntityId,
        owner: EntityId,
    ) -> Result<Option<E::Row>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE id = $1 AND user_id = $2",
            E::COLUMNS,
            E::TABLE
        );
        sqlx::query_as::<_, E::Row>(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(conn)
            .await
    }

    /// Rows of one scope, optionally only its head or tail, in no particular order.
    pub async fn find<E: PgEntity>(
        conn: &mut PgConnection,
        query: &ScopeQuery,
    ) -> Result<Vec<E::Row>, sqlx::Error> {
        let endpoint = match query.endpoint {
            None => "",
            Some(Endpoint::Head) => " AND before_id IS NULL",
            Some(Endpoint::Tail) => " AND after_id IS NULL",
        };
        let sql = format!(
            "SELECT {columns} FROM {table}
             WHERE user_id = $1 AND {parent} = $2
               AND ($3::uuid IS NULL OR id <> $3){endpoint}",
            columns = E::COLUMNS,
            table = E::TABLE,
            parent = E::PARENT_COLUMN,
        );
        sqlx::query_as::<_, E::Row>(&sql)
            .bind(query.scope.owner_id)
            .bind(query.scope.parent_id)
            .bind(query.exclude)
            .fetch_all(conn)
            .await
    }

    /// Rewrite link and parent columns. Absent patch fields keep their value.
    pub async fn update_links<E: PgEntity>(
        conn: &mut PgConnection,
        id: EntityId,
        owner: EntityId,
        patch: &LinkPatch,
    ) -> Result<Option<E::Row>, sqlx::Error> {
        let sql = format!(
            "UPDATE {table} SET
                before_id = CASE WHEN $3 THEN $4 ELSE before_id END,
                after_id = CASE WHEN $5 THEN $6 ELSE after_id END,
                {parent} = COALESCE($7, {parent}),
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {columns}",
            table = E::TABLE,
            parent = E::PARENT_COLUMN,
            columns = E::COLUMNS,
        );
        sqlx::query_as::<_, E::Row>(&sql)
            .bind(id)
            .bind(owner)
            .bind(patch.before.is_some())
            .bind(patch.before.flatten())
            .bind(patch.after.is_some())
            .bind(patch.after.flatten())
            .bind(patch.parent_id)
            .fetch_optional(conn)
            .await
    }

    /// Returns `true` if a row was removed.
    pub async fn delete<E: PgEntity>(
        conn: &mut PgConnection,
        id: EntityId,
        owner: EntityId,
    ) -> Result<bool, sqlx::Error> {
        let sql = format!("DELETE FROM {} WHERE id = $1 AND user_id = $2", E::TABLE);
        let result = sqlx::query(&sql).bind(id).bind(owner).execute(conn).await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_scope<E: PgEntity>(
        conn: &mut PgConnection,
        scope: Scope,
    ) -> Result<u64, sqlx::Error> {
        let sql = format!(
            "DELETE FROM {} WHERE user_id = $1 AND {} = $2",
            E::TABLE,
            E::PARENT_COLUMN
        );
        let result = sqlx::query(&sql)
            .bind(scope.owner_id)
            .bind(scope.parent_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Take the transaction-scoped advisory lock of one scope.
    ///
    /// Released automatically at commit or rollback.
    pub async fn lock_scope<E: PgEntity>(
        conn: &mut PgConnection,
        scope: Scope,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(scope_lock_key(E::KIND, scope))
            .execute(conn)
            .await?;
        Ok(())
    }
}

/// Advisory lock key of a scope: `<entity>:<owner>:<parent>`.
pub fn scope_lock_key(kind: &str, scope: Scope) -> String {
    format!("{kind}:{}:{}", scope.owner_id, scope.parent_id)
}
