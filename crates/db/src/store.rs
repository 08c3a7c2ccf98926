//! PostgreSQL implementation of the core store traits.

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres};
use taskboard_core::error::{CoreError, ErrorContext};
use taskboard_core::models::{Tag, TagFilter, User, UserFilter};
use taskboard_core::ordering::LinkPatch;
use taskboard_core::store::{
    ensure_key, OrderedTx, ScopeQuery, Store, TagCatalog, Transaction, UserTx,
};
use taskboard_core::types::{EntityId, Scope};

use crate::error::db_error;
use crate::repositories::{OrderedRepo, PgEntity, TagRepo, UserRepo};

/// Store backed by a connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    type Tx = PgTx;

    async fn begin(&self, isolated: bool) -> Result<PgTx, CoreError> {
        let ctx = || ErrorContext::new("transaction", "begin");
        if isolated {
            let tx = self.pool.begin().await.map_err(db_error(ctx()))?;
            Ok(PgTx::Isolated(tx))
        } else {
            let conn = self.pool.acquire().await.map_err(db_error(ctx()))?;
            Ok(PgTx::AutoCommit(conn))
        }
    }

    async fn health_check(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(db_error(ErrorContext::new("database", "health check")))
    }
}

/// A database transaction, or a plain pooled connection for auto-commit work.
pub enum PgTx {
    Isolated(sqlx::Transaction<'static, Postgres>),
    AutoCommit(PoolConnection<Postgres>),
}

impl PgTx {
    fn conn(&mut self) -> &mut PgConnection {
        match self {
            Self::Isolated(tx) => &mut **tx,
            Self::AutoCommit(conn) => &mut **conn,
        }
    }
}

#[async_trait]
impl Transaction for PgTx {
    async fn commit(self) -> Result<(), CoreError> {
        match self {
            Self::Isolated(tx) => tx
                .commit()
                .await
                .map_err(db_error(ErrorContext::new("transaction", "commit"))),
            Self::AutoCommit(_) => Ok(()),
        }
    }

    async fn rollback(self) -> Result<(), CoreError> {
        match self {
            Self::Isolated(tx) => tx
                .rollback()
                .await
                .map_err(db_error(ErrorContext::new("transaction", "rollback"))),
            Self::AutoCommit(_) => Ok(()),
        }
    }
}

fn context<E: PgEntity>(action: &'static str, id: EntityId, owner: EntityId) -> ErrorContext {
    ErrorContext::new(E::KIND, action).id(id).owner(owner)
}

#[async_trait]
impl<E: PgEntity> OrderedTx<E> for PgTx {
    async fn insert(&mut self, entity: &E) -> Result<E, CoreError> {
        let row = E::insert(self.conn(), entity)
            .await
            .map_err(db_error(entity.context("insert")))?;
        E::from_row(row)
    }

    async fn find_by_id(&mut self, id: EntityId, owner: EntityId) -> Result<E, CoreError> {
        ensure_key(E::KIND, "find", id, owner)?;
        let row = OrderedRepo::find_by_id::<E>(self.conn(), id, owner)
            .await
            .and_then(|row| row.ok_or(sqlx::Error::RowNotFound))
            .map_err(db_error(context::<E>("find", id, owner)))?;
        E::from_row(row)
    }

    async fn find(&mut self, query: &ScopeQuery) -> Result<Vec<E>, CoreError> {
        let rows = OrderedRepo::find::<E>(self.conn(), query)
            .await
            .map_err(db_error(
                ErrorContext::new(E::KIND, "find scope").owner(query.scope.owner_id),
            ))?;
        rows.into_iter().map(E::from_row).collect()
    }

    async fn update(
        &mut self,
        id: EntityId,
        owner: EntityId,
        patch: &E::Patch,
    ) -> Result<E, CoreError> {
        ensure_key(E::KIND, "update", id, owner)?;
        let row = E::update_fields(self.conn(), id, owner, patch)
            .await
            .and_then(|row| row.ok_or(sqlx::Error::RowNotFound))
            .map_err(db_error(context::<E>("update", id, owner)))?;
        E::from_row(row)
    }

    async fn update_links(
        &mut self,
        id: EntityId,
        owner: EntityId,
        patch: &LinkPatch,
    ) -> Result<E, CoreError> {
        ensure_key(E::KIND, "relink", id, owner)?;
        let row = OrderedRepo::update_links::<E>(self.conn(), id, owner, patch)
            .await
            .and_then(|row| row.ok_or(sqlx::Error::RowNotFound))
            .map_err(db_error(context::<E>("relink", id, owner)))?;
        E::from_row(row)
    }

    async fn delete(&mut self, id: EntityId, owner: EntityId) -> Result<(), CoreError> {
        ensure_key(E::KIND, "delete", id, owner)?;
        let removed = OrderedRepo::delete::<E>(self.conn(), id, owner)
            .await
            .map_err(db_error(context::<E>("delete", id, owner)))?;
        if !removed {
            return Err(CoreError::NotFound(context::<E>("delete", id, owner)));
        }
        Ok(())
    }

    async fn delete_scope(&mut self, scope: Scope) -> Result<u64, CoreError> {
        OrderedRepo::delete_scope::<E>(self.conn(), scope)
            .await
            .map_err(db_error(
                ErrorContext::new(E::KIND, "delete scope").owner(scope.owner_id),
            ))
    }

    async fn lock_scope(&mut self, scope: Scope) -> Result<(), CoreError> {
        OrderedRepo::lock_scope::<E>(self.conn(), scope)
            .await
            .map_err(db_error(
                ErrorContext::new(E::KIND, "lock scope").owner(scope.owner_id),
            ))
    }
}

#[async_trait]
impl TagCatalog for PgTx {
    async fn create_tag(&mut self, tag: &Tag) -> Result<Tag, CoreError> {
        TagRepo::create(self.conn(), tag)
            .await
            .map_err(db_error(ErrorContext::new("tag", "create tag").id(&tag.name)))?
            .try_into()
    }

    async fn find_tags(&mut self, filter: &TagFilter) -> Result<Vec<Tag>, CoreError> {
        let conn = self.conn();
        let rows = match filter {
            TagFilter::All => TagRepo::list(conn).await,
            TagFilter::Ids(ids) => TagRepo::find_by_ids(conn, ids).await,
            TagFilter::Name(name) => TagRepo::find_by_name(conn, name).await,
        }
        .map_err(db_error(ErrorContext::new("tag", "find tags")))?;
        rows.into_iter().map(Tag::try_from).collect()
    }
}

#[async_trait]
impl UserTx for PgTx {
    async fn create_user(&mut self, user: &User) -> Result<User, CoreError> {
        UserRepo::create(self.conn(), user)
            .await
            .map(User::from)
            .map_err(db_error(ErrorContext::new("user", "create user").id(&user.name)))
    }

    async fn find_user(&mut self, filter: &UserFilter) -> Result<Option<User>, CoreError> {
        let conn = self.conn();
        let row = match filter {
            UserFilter::Id(id) => UserRepo::find_by_id(conn, *id).await,
            UserFilter::Name(name) => UserRepo::find_by_name(conn, name).await,
        }
        .map_err(db_error(ErrorContext::new("user", "find user")))?;
        Ok(row.map(User::from))
    }
}
