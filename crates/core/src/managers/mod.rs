//! Scope managers: validation, transaction boundaries and cascades around the
//! chain repair engine.
//!
//! Structural validation runs before a transaction is opened. Checks that
//! need storage (parent exists, tags exist) run inside the transaction.
//! Every failure is logged once through [`CoreError::log`].

pub mod board;
pub mod item;
pub mod list;
pub mod resource;
pub mod user;

use std::sync::Arc;

pub use board::BoardManager;
pub use item::ItemManager;
pub use list::ListManager;
pub use resource::{ResourceManager, Resources};
pub use user::UserManager;

use crate::error::{CoreError, ErrorContext};
use crate::models::{Item, List};
use crate::ordering::{chain, Ordered};
use crate::store::{OrderedTx, ScopeQuery, Store};
use crate::types::{EntityId, IdGenerator, Scope, UuidV7Generator};

/// All managers over one store.
pub struct Services<S: Store> {
    pub boards: BoardManager<S>,
    pub lists: ListManager<S>,
    pub items: ItemManager<S>,
    pub users: UserManager<S>,
    pub resources: ResourceManager<S>,
    store: S,
}

impl<S: Store> Services<S> {
    pub fn new(store: S) -> Self {
        Self::with_ids(store, Arc::new(UuidV7Generator))
    }

    pub fn with_ids(store: S, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            boards: BoardManager::new(store.clone(), Arc::clone(&ids)),
            lists: ListManager::new(store.clone(), Arc::clone(&ids)),
            items: ItemManager::new(store.clone(), Arc::clone(&ids)),
            users: UserManager::new(store.clone(), Arc::clone(&ids)),
            resources: ResourceManager::new(store.clone(), ids),
            store,
        }
    }

    /// Liveness of the backing storage.
    pub async fn health_check(&self) -> Result<(), CoreError> {
        self.store.health_check().await
    }
}

/// Load a whole scope in chain order.
///
/// A malformed chain is a server error, never a truncated result.
pub(crate) async fn read_scope<E, T>(
    tx: &mut T,
    scope: Scope,
    ctx: &ErrorContext,
) -> Result<Vec<E>, CoreError>
where
    E: Ordered,
    T: OrderedTx<E> + ?Sized,
{
    let rows: Vec<E> = tx.find(&ScopeQuery::all(scope)).await?;
    chain::materialize(rows).map_err(|err| CoreError::server(ctx.clone(), err))
}

/// Remove every item of a list. The list's own row is left alone.
pub(crate) async fn cascade_list<T>(
    tx: &mut T,
    owner: EntityId,
    list_id: EntityId,
) -> Result<u64, CoreError>
where
    T: OrderedTx<Item> + ?Sized,
{
    let scope = Scope::new(owner, list_id);
    tx.lock_scope(scope).await?;
    tx.delete_scope(scope).await
}

/// Remove every list of a board and every item of those lists.
///
/// Returns `(lists, items)` removed.
pub(crate) async fn cascade_board<T>(
    tx: &mut T,
    owner: EntityId,
    board_id: EntityId,
) -> Result<(u64, u64), CoreError>
where
    T: OrderedTx<List> + OrderedTx<Item> + ?Sized,
{
    let scope = Scope::new(owner, board_id);
    OrderedTx::<List>::lock_scope(tx, scope).await?;
    let mut lists = OrderedTx::<List>::find(tx, &ScopeQuery::all(scope)).await?;
    // Item scopes are locked in the same sorted order `load_locked` uses.
    lists.sort_by_key(|list| list.id);

    let mut items = 0;
    for list in &lists {
        items += cascade_list(tx, owner, list.id).await?;
    }
    let lists = OrderedTx::<List>::delete_scope(tx, scope).await?;
    Ok((lists, items))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use uuid::Uuid;

    use super::*;
    use crate::memory::{MemoryStore, MemoryTable, MemoryTx};
    use crate::models::{CreateBoard, CreateItem, CreateList};
    use crate::ordering::LinkPatch;
    use crate::store::Transaction;

    /// Records every scope lock and returns scope rows newest first, the way
    /// an unordered table scan may.
    struct RecordingTx {
        inner: MemoryTx,
        locks: Vec<Scope>,
    }

    #[async_trait]
    impl<E: MemoryTable> OrderedTx<E> for RecordingTx {
        async fn insert(&mut self, entity: &E) -> Result<E, CoreError> {
            OrderedTx::<E>::insert(&mut self.inner, entity).await
        }

        async fn find_by_id(&mut self, id: EntityId, owner: EntityId) -> Result<E, CoreError> {
            OrderedTx::<E>::find_by_id(&mut self.inner, id, owner).await
        }

        async fn find(&mut self, query: &ScopeQuery) -> Result<Vec<E>, CoreError> {
            let mut rows: Vec<E> = OrderedTx::<E>::find(&mut self.inner, query).await?;
            rows.sort_by_key(|row| std::cmp::Reverse(row.id()));
            Ok(rows)
        }

        async fn update(
            &mut self,
            id: EntityId,
            owner: EntityId,
            patch: &E::Patch,
        ) -> Result<E, CoreError> {
            OrderedTx::<E>::update(&mut self.inner, id, owner, patch).await
        }

        async fn update_links(
            &mut self,
            id: EntityId,
            owner: EntityId,
            patch: &LinkPatch,
        ) -> Result<E, CoreError> {
            OrderedTx::<E>::update_links(&mut self.inner, id, owner, patch).await
        }

        async fn delete(&mut self, id: EntityId, owner: EntityId) -> Result<(), CoreError> {
            OrderedTx::<E>::delete(&mut self.inner, id, owner).await
        }

        async fn delete_scope(&mut self, scope: Scope) -> Result<u64, CoreError> {
            OrderedTx::<E>::delete_scope(&mut self.inner, scope).await
        }

        async fn lock_scope(&mut self, scope: Scope) -> Result<(), CoreError> {
            self.locks.push(scope);
            OrderedTx::<E>::lock_scope(&mut self.inner, scope).await
        }
    }

    #[tokio::test]
    async fn board_cascade_locks_item_scopes_in_sorted_order() {
        let store = MemoryStore::new();
        let services = Services::new(store.clone());
        let user = Uuid::now_v7();
        let board = services
            .boards
            .create(
                user,
                CreateBoard {
                    title: "b".into(),
                    text: None,
                    color: "red".into(),
                },
            )
            .await
            .unwrap();
        let mut lists = Vec::new();
        for title in ["one", "two", "three"] {
            let list = services
                .lists
                .create(
                    user,
                    CreateList {
                        board_id: Some(board.id),
                        title: title.into(),
                    },
                )
                .await
                .unwrap();
            services
                .items
                .create(
                    user,
                    CreateItem {
                        list_id: Some(list.id),
                        title: "card".into(),
                        text: None,
                        tags: vec![],
                    },
                )
                .await
                .unwrap();
            lists.push(list.id);
        }

        let mut tx = RecordingTx {
            inner: store.begin(true).await.unwrap(),
            locks: Vec::new(),
        };
        let removed = cascade_board(&mut tx, user, board.id).await.unwrap();
        assert_eq!(removed, (3, 3));

        let mut item_scopes: Vec<Scope> =
            lists.iter().map(|id| Scope::new(user, *id)).collect();
        item_scopes.sort();
        let mut expected = vec![Scope::new(user, board.id)];
        expected.extend(item_scopes);
        assert_eq!(tx.locks, expected);

        tx.inner.rollback().await.unwrap();
    }
}
