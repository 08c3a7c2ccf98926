//! Store and transaction seams.
//!
//! The repair engine and managers only ever talk to these traits, so every
//! ordering rule runs unchanged against PostgreSQL (`taskboard-db`) and the
//! in-memory store used by tests.

use async_trait::async_trait;

use crate::error::{CoreError, ErrorContext};
use crate::models::{Board, Item, List, Tag, TagFilter, User, UserFilter};
use crate::ordering::{LinkPatch, Ordered};
use crate::types::{is_empty_id, EntityId, Scope};

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Transaction: Send {
    async fn commit(self) -> Result<(), CoreError>;
    async fn rollback(self) -> Result<(), CoreError>;
}

/// Entry point of a storage backend.
#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    type Tx: Transaction
        + OrderedTx<Board>
        + OrderedTx<List>
        + OrderedTx<Item>
        + TagCatalog
        + UserTx;

    /// Open a transaction.
    ///
    /// With `isolated == false` the handle may auto-commit every statement;
    /// `commit` and `rollback` are then no-ops.
    async fn begin(&self, isolated: bool) -> Result<Self::Tx, CoreError>;

    /// Liveness probe of the backing storage.
    async fn health_check(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

/// Commit on success, roll back on failure, and hand back the original result.
///
/// A failed rollback is logged; the caller still receives the error that
/// caused it.
pub async fn finish<T, R>(tx: T, result: Result<R, CoreError>) -> Result<R, CoreError>
where
    T: Transaction,
{
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}

// ---------------------------------------------------------------------------
// Ordered entities
// ---------------------------------------------------------------------------

/// Which end of a chain a query selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `before IS NULL`
    Head,
    /// `after IS NULL`
    Tail,
}

/// Conditions for [`OrderedTx::find`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeQuery {
    pub scope: Scope,
    pub endpoint: Option<Endpoint>,
    pub exclude: Option<EntityId>,
}

impl ScopeQuery {
    pub fn all(scope: Scope) -> Self {
        Self {
            scope,
            endpoint: None,
            exclude: None,
        }
    }

    pub fn head(scope: Scope) -> Self {
        Self {
            endpoint: Some(Endpoint::Head),
            ..Self::all(scope)
        }
    }

    pub fn tail(scope: Scope) -> Self {
        Self {
            endpoint: Some(Endpoint::Tail),
            ..Self::all(scope)
        }
    }

    pub fn excluding(mut self, id: EntityId) -> Self {
        self.exclude = Some(id);
        self
    }

    pub fn matches<E: Ordered>(&self, entity: &E) -> bool {
        let links = entity.links();
        entity.scope() == self.scope
            && self.exclude != Some(entity.id())
            && match self.endpoint {
                None => true,
                Some(Endpoint::Head) => links.before.is_none(),
                Some(Endpoint::Tail) => links.after.is_none(),
            }
    }
}

/// Pure persistence of one ordered entity type. No ordering rules live here.
///
/// `find_by_id`, `update`, `update_links` and `delete` fail with `NotFound`
/// when no row matches `(id, owner)`.
#[async_trait]
pub trait OrderedTx<E: Ordered>: Send {
    async fn insert(&mut self, entity: &E) -> Result<E, CoreError>;

    async fn find_by_id(&mut self, id: EntityId, owner: EntityId) -> Result<E, CoreError>;

    /// Unordered rows matching `query`.
    async fn find(&mut self, query: &ScopeQuery) -> Result<Vec<E>, CoreError>;

    async fn update(
        &mut self,
        id: EntityId,
        owner: EntityId,
        patch: &E::Patch,
    ) -> Result<E, CoreError>;

    async fn update_links(
        &mut self,
        id: EntityId,
        owner: EntityId,
        patch: &LinkPatch,
    ) -> Result<E, CoreError>;

    async fn delete(&mut self, id: EntityId, owner: EntityId) -> Result<(), CoreError>;

    /// Remove every row of a scope. Returns the number of rows removed.
    async fn delete_scope(&mut self, scope: Scope) -> Result<u64, CoreError>;

    /// Serialize chain mutations of `scope` until the transaction ends.
    async fn lock_scope(&mut self, scope: Scope) -> Result<(), CoreError>;
}

// ---------------------------------------------------------------------------
// Tags and users
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TagCatalog: Send {
    async fn create_tag(&mut self, tag: &Tag) -> Result<Tag, CoreError>;
    async fn find_tags(&mut self, filter: &TagFilter) -> Result<Vec<Tag>, CoreError>;
}

#[async_trait]
pub trait UserTx: Send {
    /// Fails with `Conflict` when the name is taken.
    async fn create_user(&mut self, user: &User) -> Result<User, CoreError>;
    async fn find_user(&mut self, filter: &UserFilter) -> Result<Option<User>, CoreError>;
}

/// Reject a structurally empty key before it reaches storage.
///
/// The error carries the `NO_ID` marker instead of the nil id.
pub fn ensure_key(
    entity: &'static str,
    action: &'static str,
    id: EntityId,
    owner: EntityId,
) -> Result<(), CoreError> {
    if is_empty_id(id) || is_empty_id(owner) {
        return Err(CoreError::NotFound(ErrorContext::new(entity, action)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use uuid::Uuid;

    use super::*;
    use crate::error::NO_ID;
    use crate::models::Color;

    fn board(user: EntityId, before: Option<EntityId>, after: Option<EntityId>) -> Board {
        Board {
            id: Uuid::now_v7(),
            user_id: user,
            title: "b".into(),
            text: None,
            color: Color::Red,
            before,
            after,
        }
    }

    #[test]
    fn query_selects_endpoints_and_exclusions() {
        let user = Uuid::now_v7();
        let head = board(user, None, Some(Uuid::now_v7()));
        let scope = Scope::owner(user);
        assert!(ScopeQuery::head(scope).matches(&head));
        assert!(!ScopeQuery::tail(scope).matches(&head));
        assert!(!ScopeQuery::all(scope).excluding(head.id).matches(&head));
        assert!(!ScopeQuery::all(Scope::owner(Uuid::now_v7())).matches(&head));
    }

    #[test]
    fn nil_key_is_not_found_with_marker() {
        let err = ensure_key("list", "find list", Uuid::nil(), Uuid::now_v7()).unwrap_err();
        assert_matches!(&err, CoreError::NotFound(ctx) if ctx.id == NO_ID);
        assert!(ensure_key("list", "find list", Uuid::now_v7(), Uuid::now_v7()).is_ok());
    }
}
