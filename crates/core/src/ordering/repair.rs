//! Chain repair sequences.
//!
//! Each function runs inside a caller-owned transaction and leaves commit or
//! rollback to the caller. Every sequence locks the scopes it touches before
//! its first chain read.

use crate::error::{CoreError, ErrorContext, InvalidReason};
use crate::ordering::{LinkPatch, Links, Ordered};
use crate::store::{Endpoint, OrderedTx, ScopeQuery};
use crate::types::{EntityId, Scope};

/// Attempts at pinning an entity's scope while it is being moved elsewhere.
const LOCK_ATTEMPTS: usize = 3;

/// Append `entity` to the tail of its scope and insert it.
pub async fn insert_at_tail<E, T>(tx: &mut T, mut entity: E) -> Result<E, CoreError>
where
    E: Ordered,
    T: OrderedTx<E> + ?Sized,
{
    let ctx = entity.context("insert");
    let scope = entity.scope();
    tx.lock_scope(scope).await?;

    let tail = endpoint::<E, T>(tx, scope, Endpoint::Tail, entity.id(), &ctx).await?;
    let tail_id = tail.map(|t| t.id());
    entity.set_links(Links::new(tail_id, None));

    if let Some(tail_id) = tail_id {
        let patch = LinkPatch::after(Some(entity.id()));
        relink::<E, T>(tx, tail_id, entity.owner_id(), patch, &ctx).await?;
    }
    tx.insert(&entity).await
}

/// Remove one node and join its neighbours. Returns the removed row.
///
/// Children of the node are not touched; cascading is the caller's job.
pub async fn delete_with_splice<E, T>(
    tx: &mut T,
    id: EntityId,
    owner: EntityId,
) -> Result<E, CoreError>
where
    E: Ordered,
    T: OrderedTx<E> + ?Sized,
{
    let target: E = load_locked(tx, id, owner, None).await?;
    let ctx = target.context("delete");
    unsplice(tx, &target, &ctx).await?;
    tx.delete(id, owner).await?;
    Ok(target)
}

/// Place a node directly after `before` (or at the head when `None`).
///
/// `target_parent` moves the node into another parent scope of the same
/// owner; `None` keeps its current parent.
pub async fn move_to_position<E, T>(
    tx: &mut T,
    id: EntityId,
    owner: EntityId,
    target_parent: Option<EntityId>,
    before: Option<EntityId>,
) -> Result<E, CoreError>
where
    E: Ordered,
    T: OrderedTx<E> + ?Sized,
{
    let ctx = ErrorContext::new(E::KIND, "move").id(id).owner(owner);
    if before == Some(id) {
        return Err(CoreError::invalid(ctx, InvalidReason::SelfPredecessor));
    }

    let also = target_parent.map(|parent| Scope::new(owner, parent));
    let old: E = load_locked(tx, id, owner, also).await?;
    let target = Scope::new(owner, target_parent.unwrap_or_else(|| old.parent_id()));

    unsplice(tx, &old, &ctx).await?;

    // Read after the un-splice so an unchanged position stays a no-op.
    let after = match before {
        None => endpoint::<E, T>(tx, target, Endpoint::Head, id, &ctx)
            .await?
            .map(|head| head.id()),
        Some(predecessor) => {
            let pred: E = tx.find_by_id(predecessor, owner).await?;
            if pred.parent_id() != target.parent_id {
                return Err(CoreError::invalid(
                    ctx,
                    InvalidReason::PredecessorOutOfScope {
                        predecessor,
                        parent: target.parent_id,
                    },
                ));
            }
            pred.links().after
        }
    };

    if let Some(predecessor) = before {
        relink::<E, T>(tx, predecessor, owner, LinkPatch::after(Some(id)), &ctx).await?;
    }
    if let Some(successor) = after {
        relink::<E, T>(tx, successor, owner, LinkPatch::before(Some(id)), &ctx).await?;
    }
    let placed = LinkPatch::place(Links::new(before, after), target.parent_id);
    tx.update_links(id, owner, &placed).await
}

/// Load a node and hold the lock on its scope, plus `also` when given.
///
/// Scopes are locked in sorted order. If the node changed scope between the
/// first read and the lock, the read is retried.
pub async fn load_locked<E, T>(
    tx: &mut T,
    id: EntityId,
    owner: EntityId,
    also: Option<Scope>,
) -> Result<E, CoreError>
where
    E: Ordered,
    T: OrderedTx<E> + ?Sized,
{
    for _ in 0..LOCK_ATTEMPTS {
        let seen: E = tx.find_by_id(id, owner).await?;
        let mut scopes = vec![seen.scope()];
        if let Some(extra) = also.filter(|s| *s != seen.scope()) {
            scopes.push(extra);
        }
        scopes.sort();
        for scope in scopes {
            tx.lock_scope(scope).await?;
        }

        let locked: E = tx.find_by_id(id, owner).await?;
        if locked.scope() == seen.scope() {
            return Ok(locked);
        }
        tracing::debug!(entity = E::KIND, %id, "Scope changed while locking, retrying");
    }
    Err(CoreError::server(
        ErrorContext::new(E::KIND, "lock").id(id).owner(owner),
        "scope kept changing while acquiring locks",
    ))
}

/// Point the neighbours of `node` at each other.
async fn unsplice<E, T>(tx: &mut T, node: &E, ctx: &ErrorContext) -> Result<(), CoreError>
where
    E: Ordered,
    T: OrderedTx<E> + ?Sized,
{
    let links = node.links();
    let owner = node.owner_id();
    if let Some(predecessor) = links.before {
        relink::<E, T>(tx, predecessor, owner, LinkPatch::after(links.after), ctx).await?;
    }
    if let Some(successor) = links.after {
        relink::<E, T>(tx, successor, owner, LinkPatch::before(links.before), ctx).await?;
    }
    Ok(())
}

/// Rewrite a neighbour's link. A missing neighbour means the chain is corrupt.
async fn relink<E, T>(
    tx: &mut T,
    id: EntityId,
    owner: EntityId,
    patch: LinkPatch,
    ctx: &ErrorContext,
) -> Result<(), CoreError>
where
    E: Ordered,
    T: OrderedTx<E> + ?Sized,
{
    match tx.update_links(id, owner, &patch).await {
        Ok(_) => Ok(()),
        Err(CoreError::NotFound(_)) => Err(CoreError::server(
            ctx.clone(),
            format!("dangling link to {} {id}", E::KIND),
        )),
        Err(err) => Err(err),
    }
}

/// The head or tail of `scope`, ignoring `exclude`.
///
/// `None` only when no other node exists. Zero endpoints in a populated
/// scope, or more than one, is a consistency failure.
async fn endpoint<E, T>(
    tx: &mut T,
    scope: Scope,
    which: Endpoint,
    exclude: EntityId,
    ctx: &ErrorContext,
) -> Result<Option<E>, CoreError>
where
    E: Ordered,
    T: OrderedTx<E> + ?Sized,
{
    let query = match which {
        Endpoint::Head => ScopeQuery::head(scope),
        Endpoint::Tail => ScopeQuery::tail(scope),
    }
    .excluding(exclude);
    let mut found: Vec<E> = tx.find(&query).await?;
    match found.len() {
        0 => {
            let others: Vec<E> = tx.find(&ScopeQuery::all(scope).excluding(exclude)).await?;
            if others.is_empty() {
                Ok(None)
            } else {
                Err(CoreError::server(
                    ctx.clone(),
                    format!("{:?} missing in scope of {} nodes", which, others.len()),
                ))
            }
        }
        1 => Ok(found.pop()),
        n => Err(CoreError::server(
            ctx.clone(),
            format!("{n} nodes claim {which:?} of one scope"),
        )),
    }
}
