//! In-memory store.
//!
//! A single async mutex guards all tables and is held for the lifetime of
//! every transaction, so transactions run one at a time. Isolated
//! transactions write to a staged copy that replaces the tables on commit.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::{CoreError, ErrorContext};
use crate::models::{Board, Item, List, Tag, TagFilter, User, UserFilter};
use crate::ordering::{LinkPatch, Ordered};
use crate::store::{ensure_key, OrderedTx, ScopeQuery, Store, TagCatalog, Transaction, UserTx};
use crate::types::{EntityId, Scope};

/// Every table of the in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    boards: BTreeMap<EntityId, Board>,
    lists: BTreeMap<EntityId, List>,
    items: BTreeMap<EntityId, Item>,
    tags: Vec<Tag>,
    users: Vec<User>,
}

/// Maps an ordered entity type to its table.
pub trait MemoryTable: Ordered {
    fn table(state: &mut MemoryState) -> &mut BTreeMap<EntityId, Self>;
}

impl MemoryTable for Board {
    fn table(state: &mut MemoryState) -> &mut BTreeMap<EntityId, Self> {
        &mut state.boards
    }
}

impl MemoryTable for List {
    fn table(state: &mut MemoryState) -> &mut BTreeMap<EntityId, Self> {
        &mut state.lists
    }
}

impl MemoryTable for Item {
    fn table(state: &mut MemoryState) -> &mut BTreeMap<EntityId, Self> {
        &mut state.items
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    /// Countdown to an injected write failure; 0 disables it.
    fail_on_write: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `n`th write from now fail with a server error.
    pub fn fail_on_write(&self, n: usize) {
        self.fail_on_write.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self, isolated: bool) -> Result<MemoryTx, CoreError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = isolated.then(|| guard.clone());
        Ok(MemoryTx {
            guard,
            staged,
            fail_on_write: Arc::clone(&self.fail_on_write),
        })
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    staged: Option<MemoryState>,
    fail_on_write: Arc<AtomicUsize>,
}

impl MemoryTx {
    fn state(&mut self) -> &mut MemoryState {
        match &mut self.staged {
            Some(staged) => staged,
            None => &mut *self.guard,
        }
    }

    fn check_write(&self, ctx: impl FnOnce() -> ErrorContext) -> Result<(), CoreError> {
        let tripped = self
            .fail_on_write
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .map(|previous| previous == 1)
            .unwrap_or(false);
        if tripped {
            return Err(CoreError::server(ctx(), "injected write failure"));
        }
        Ok(())
    }

    fn row<E: MemoryTable>(
        &mut self,
        id: EntityId,
        owner: EntityId,
        action: &'static str,
    ) -> Result<&mut E, CoreError> {
        ensure_key(E::KIND, action, id, owner)?;
        E::table(self.state())
            .get_mut(&id)
            .filter(|row| row.owner_id() == owner)
            .ok_or_else(|| {
                CoreError::NotFound(ErrorContext::new(E::KIND, action).id(id).owner(owner))
            })
    }
}

#[async_trait]
impl Transaction for MemoryTx {
    async fn commit(mut self) -> Result<(), CoreError> {
        if let Some(staged) = self.staged.take() {
            *self.guard = staged;
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), CoreError> {
        Ok(())
    }
}

#[async_trait]
impl<E: MemoryTable> OrderedTx<E> for MemoryTx {
    async fn insert(&mut self, entity: &E) -> Result<E, CoreError> {
        self.check_write(|| entity.context("insert"))?;
        let table = E::table(self.state());
        if table.contains_key(&entity.id()) {
            return Err(CoreError::Conflict(entity.context("insert")));
        }
        table.insert(entity.id(), entity.clone());
        Ok(entity.clone())
    }

    async fn find_by_id(&mut self, id: EntityId, owner: EntityId) -> Result<E, CoreError> {
        self.row::<E>(id, owner, "find").map(|row| row.clone())
    }

    async fn find(&mut self, query: &ScopeQuery) -> Result<Vec<E>, CoreError> {
        Ok(E::table(self.state())
            .values()
            .filter(|row| query.matches(*row))
            .cloned()
            .collect())
    }

    async fn update(
        &mut self,
        id: EntityId,
        owner: EntityId,
        patch: &E::Patch,
    ) -> Result<E, CoreError> {
        self.row::<E>(id, owner, "update")?;
        self.check_write(|| ErrorContext::new(E::KIND, "update").id(id).owner(owner))?;
        let row = self.row::<E>(id, owner, "update")?;
        row.apply_patch(patch);
        Ok(row.clone())
    }

    async fn update_links(
        &mut self,
        id: EntityId,
        owner: EntityId,
        patch: &LinkPatch,
    ) -> Result<E, CoreError> {
        self.row::<E>(id, owner, "relink")?;
        self.check_write(|| ErrorContext::new(E::KIND, "relink").id(id).owner(owner))?;
        let row = self.row::<E>(id, owner, "relink")?;
        patch.apply(row);
        Ok(row.clone())
    }

    async fn delete(&mut self, id: EntityId, owner: EntityId) -> Result<(), CoreError> {
        self.row::<E>(id, owner, "delete")?;
        self.check_write(|| ErrorContext::new(E::KIND, "delete").id(id).owner(owner))?;
        E::table(self.state()).remove(&id);
        Ok(())
    }

    async fn delete_scope(&mut self, scope: Scope) -> Result<u64, CoreError> {
        self.check_write(|| ErrorContext::new(E::KIND, "delete scope").owner(scope.owner_id))?;
        let table = E::table(self.state());
        let before = table.len();
        table.retain(|_, row| row.scope() != scope);
        Ok((before - table.len()) as u64)
    }

    // The store-wide mutex already serializes every transaction.
    async fn lock_scope(&mut self, _scope: Scope) -> Result<(), CoreError> {
        Ok(())
    }
}

#[async_trait]
impl TagCatalog for MemoryTx {
    async fn create_tag(&mut self, tag: &Tag) -> Result<Tag, CoreError> {
        self.check_write(|| ErrorContext::new("tag", "create tag").id(tag.id))?;
        let tags = &mut self.state().tags;
        if tags.iter().any(|t| t.id == tag.id || t.name == tag.name) {
            return Err(CoreError::Conflict(
                ErrorContext::new("tag", "create tag").id(&tag.name),
            ));
        }
        tags.push(tag.clone());
        Ok(tag.clone())
    }

    async fn find_tags(&mut self, filter: &TagFilter) -> Result<Vec<Tag>, CoreError> {
        Ok(self
            .state()
            .tags
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserTx for MemoryTx {
    async fn create_user(&mut self, user: &User) -> Result<User, CoreError> {
        self.check_write(|| ErrorContext::new("user", "create user").id(&user.name))?;
        let users = &mut self.state().users;
        if users.iter().any(|u| u.id == user.id || u.name == user.name) {
            return Err(CoreError::Conflict(
                ErrorContext::new("user", "create user").id(&user.name),
            ));
        }
        users.push(user.clone());
        Ok(user.clone())
    }

    async fn find_user(&mut self, filter: &UserFilter) -> Result<Option<User>, CoreError> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|u| filter.matches(u))
            .cloned())
    }
}
