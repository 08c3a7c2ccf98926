use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Every board, list, item, user and tag is keyed by a server-generated UUID.
pub type EntityId = Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// The set of siblings that share one ordering chain.
///
/// Boards are scoped by their owner alone, so a board scope uses the owner id
/// as its parent. Lists are scoped by `(board, owner)` and items by `(list, owner)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Scope {
    pub owner_id: EntityId,
    pub parent_id: EntityId,
}

impl Scope {
    pub fn new(owner_id: EntityId, parent_id: EntityId) -> Self {
        Self {
            owner_id,
            parent_id,
        }
    }

    /// The scope of a user's boards.
    pub fn owner(owner_id: EntityId) -> Self {
        Self::new(owner_id, owner_id)
    }
}

/// Source of fresh entity ids.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> EntityId;
}

/// Time-ordered UUIDv7 ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn generate(&self) -> EntityId {
        Uuid::now_v7()
    }
}

/// `true` when `id` is the structurally-empty key.
pub fn is_empty_id(id: EntityId) -> bool {
    id.is_nil()
}

/// Deserialize an optional link where `null`, a missing field and `""` all mean
/// "no link".
///
/// Use with `#[serde(default, deserialize_with = "types::empty_as_none")]`.
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<EntityId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => Uuid::parse_str(s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "empty_as_none")]
        before: Option<EntityId>,
    }

    #[test]
    fn empty_string_and_null_are_no_link() {
        let a: Probe = serde_json::from_str(r#"{"before": ""}"#).unwrap();
        let b: Probe = serde_json::from_str(r#"{"before": null}"#).unwrap();
        let c: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(a.before, None);
        assert_eq!(b.before, None);
        assert_eq!(c.before, None);
    }

    #[test]
    fn uuid_string_is_a_link() {
        let id = Uuid::now_v7();
        let json = format!(r#"{{"before": "{id}"}}"#);
        let probe: Probe = serde_json::from_str(&json).unwrap();
        assert_eq!(probe.before, Some(id));
    }

    #[test]
    fn garbage_link_is_rejected() {
        let result: Result<Probe, _> = serde_json::from_str(r#"{"before": "nope"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn board_scope_uses_owner_as_parent() {
        let owner = Uuid::now_v7();
        assert_eq!(Scope::owner(owner), Scope::new(owner, owner));
    }
}
