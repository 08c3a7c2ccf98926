use std::collections::HashMap;

use crate::ordering::Ordered;
use crate::types::EntityId;

/// A scope whose links do not form exactly one chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("scope of {0} nodes has no head")]
    MissingHead(usize),

    #[error("several nodes claim predecessor {before:?}")]
    Fork { before: Option<EntityId> },

    #[error("{previous} does not point forward to its successor {node}")]
    BrokenLink { previous: EntityId, node: EntityId },

    #[error("tail {node} still points forward to {after}")]
    DanglingTail { node: EntityId, after: EntityId },

    #[error("{0} nodes are unreachable from the head")]
    Unreachable(usize),
}

/// Arrange an unordered scope in chain order.
///
/// Nodes are keyed by their `before` link and walked from the node with no
/// predecessor. Both directions of every link are checked, and leftovers
/// (cycles, detached runs) are reported instead of silently dropped.
pub fn materialize<E: Ordered>(nodes: Vec<E>) -> Result<Vec<E>, ChainError> {
    let total = nodes.len();
    let mut by_before: HashMap<Option<EntityId>, E> = HashMap::with_capacity(total);
    for node in nodes {
        let before = node.links().before;
        if by_before.insert(before, node).is_some() {
            return Err(ChainError::Fork { before });
        }
    }

    let mut ordered: Vec<E> = Vec::with_capacity(total);
    let mut cursor: Option<EntityId> = None;
    while let Some(node) = by_before.remove(&cursor) {
        if let Some(previous) = ordered.last() {
            if previous.links().after != Some(node.id()) {
                return Err(ChainError::BrokenLink {
                    previous: previous.id(),
                    node: node.id(),
                });
            }
        }
        cursor = Some(node.id());
        ordered.push(node);
    }

    if ordered.is_empty() && total > 0 {
        return Err(ChainError::MissingHead(total));
    }
    if !by_before.is_empty() {
        return Err(ChainError::Unreachable(by_before.len()));
    }
    if let Some(tail) = ordered.last() {
        if let Some(after) = tail.links().after {
            return Err(ChainError::DanglingTail {
                node: tail.id(),
                after,
            });
        }
    }
    Ok(ordered)
}

/// Validate a scope without keeping the ordered copy.
pub fn check<E: Ordered>(nodes: &[E]) -> Result<(), ChainError> {
    materialize(nodes.to_vec()).map(|_| ())
}
