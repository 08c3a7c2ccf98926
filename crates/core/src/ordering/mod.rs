//! Linked ordering of boards, lists and items.
//!
//! Every ordered entity stores the id of its predecessor (`before`) and
//! successor (`after`) inside its scope. Within a scope those pointers form a
//! single doubly-linked chain: one head with no `before`, one tail with no
//! `after`, and `a.after == b` exactly when `b.before == a`.
//!
//! - [`repair`] -- insert-at-tail, delete-with-splice and move-to-position,
//!   run inside a store transaction.
//! - [`chain`] -- materializes an unordered scope into chain order and
//!   detects malformed chains.

pub mod chain;
pub mod repair;

use crate::error::ErrorContext;
use crate::types::{EntityId, Scope};

/// The `before`/`after` pointer pair of one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Links {
    pub before: Option<EntityId>,
    pub after: Option<EntityId>,
}

impl Links {
    pub fn new(before: Option<EntityId>, after: Option<EntityId>) -> Self {
        Self { before, after }
    }
}

/// An entity that lives in a linked chain scoped by `(owner, parent)`.
pub trait Ordered: Clone + Send + Sync + 'static {
    /// Entity label used in errors, logs and scope lock keys.
    const KIND: &'static str;

    /// Validated set of non-positional field changes.
    type Patch: Send + Sync;

    fn id(&self) -> EntityId;
    fn owner_id(&self) -> EntityId;
    fn parent_id(&self) -> EntityId;
    fn set_parent_id(&mut self, parent_id: EntityId);
    fn links(&self) -> Links;
    fn set_links(&mut self, links: Links);

    /// Apply non-positional changes in place. Never touches links.
    fn apply_patch(&mut self, patch: &Self::Patch);

    fn scope(&self) -> Scope {
        Scope::new(self.owner_id(), self.parent_id())
    }

    fn context(&self, action: &'static str) -> ErrorContext {
        ErrorContext::new(Self::KIND, action)
            .id(self.id())
            .owner(self.owner_id())
    }
}

/// A field-level update of positional columns.
///
/// `None` leaves a field untouched; `Some(None)` clears a link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkPatch {
    pub before: Option<Option<EntityId>>,
    pub after: Option<Option<EntityId>>,
    pub parent_id: Option<EntityId>,
}

impl LinkPatch {
    pub fn before(before: Option<EntityId>) -> Self {
        Self {
            before: Some(before),
            ..Self::default()
        }
    }

    pub fn after(after: Option<EntityId>) -> Self {
        Self {
            after: Some(after),
            ..Self::default()
        }
    }

    /// Overwrite both links and the parent in one write.
    pub fn place(links: Links, parent_id: EntityId) -> Self {
        Self {
            before: Some(links.before),
            after: Some(links.after),
            parent_id: Some(parent_id),
        }
    }

    pub fn apply<E: Ordered>(&self, entity: &mut E) {
        let mut links = entity.links();
        if let Some(before) = self.before {
            links.before = before;
        }
        if let Some(after) = self.after {
            links.after = after;
        }
        entity.set_links(links);
        if let Some(parent_id) = self.parent_id {
            entity.set_parent_id(parent_id);
        }
    }
}
