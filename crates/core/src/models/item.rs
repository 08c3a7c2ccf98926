//! Item entity model and DTOs.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ErrorContext, InvalidReason};
use crate::models::{normalize_text, require_text};
use crate::ordering::{Links, Ordered};
use crate::types::{empty_as_none, is_empty_id, EntityId};

/// A card in a list. Items are ordered per `(list, owner)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: EntityId,
    pub list_id: EntityId,
    pub user_id: EntityId,
    pub title: String,
    pub text: Option<String>,
    /// Tag ids in the order the caller supplied them, without duplicates.
    pub tags: Vec<EntityId>,
    pub before: Option<EntityId>,
    pub after: Option<EntityId>,
}

impl Ordered for Item {
    const KIND: &'static str = "item";
    type Patch = ItemPatch;

    fn id(&self) -> EntityId {
        self.id
    }

    fn owner_id(&self) -> EntityId {
        self.user_id
    }

    fn parent_id(&self) -> EntityId {
        self.list_id
    }

    fn set_parent_id(&mut self, parent_id: EntityId) {
        self.list_id = parent_id;
    }

    fn links(&self) -> Links {
        Links::new(self.before, self.after)
    }

    fn set_links(&mut self, links: Links) {
        self.before = links.before;
        self.after = links.after;
    }

    fn apply_patch(&mut self, patch: &ItemPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(tags) = &patch.tags {
            self.tags = tags.clone();
        }
    }
}

/// DTO for creating a new item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub list_id: Option<EntityId>,
    pub title: String,
    pub text: Option<String>,
    #[serde(default)]
    pub tags: Vec<EntityId>,
}

impl CreateItem {
    /// Structural validation only. Tag and list existence are checked by the
    /// manager inside the transaction.
    pub fn into_item(self, id: EntityId, user_id: EntityId) -> Result<Item, CoreError> {
        let ctx = ErrorContext::new(Item::KIND, "create item").id(id).owner(user_id);
        if is_empty_id(user_id) {
            return Err(CoreError::invalid(ctx, InvalidReason::MissingField("user_id")));
        }
        let list_id = self
            .list_id
            .filter(|l| !is_empty_id(*l))
            .ok_or_else(|| {
                CoreError::invalid(ctx.clone(), InvalidReason::MissingField("list_id"))
            })?;
        require_text(&self.title, "title", &ctx)?;
        Ok(Item {
            id,
            list_id,
            user_id,
            title: self.title.trim().to_string(),
            text: normalize_text(self.text),
            tags: dedup_tags(self.tags),
            before: None,
            after: None,
        })
    }
}

/// DTO for updating an existing item. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItem {
    pub title: Option<String>,
    /// An empty string clears the text.
    pub text: Option<String>,
    /// Replaces the whole tag set when present.
    pub tags: Option<Vec<EntityId>>,
}

impl UpdateItem {
    pub fn into_patch(self, ctx: &ErrorContext) -> Result<ItemPatch, CoreError> {
        if let Some(title) = &self.title {
            require_text(title, "title", ctx)?;
        }
        Ok(ItemPatch {
            title: self.title.map(|t| t.trim().to_string()),
            text: self.text.map(|t| normalize_text(Some(t))),
            tags: self.tags.map(dedup_tags),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub text: Option<Option<String>>,
    pub tags: Option<Vec<EntityId>>,
}

/// Request body for repositioning an item, optionally into another list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoveItem {
    /// Target list. `None` keeps the current list.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub list_id: Option<EntityId>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub before: Option<EntityId>,
}

fn dedup_tags(tags: Vec<EntityId>) -> Vec<EntityId> {
    let mut seen = Vec::with_capacity(tags.len());
    for tag in tags {
        if !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn create_keeps_tag_order_and_drops_duplicates() {
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let item = CreateItem {
            list_id: Some(Uuid::now_v7()),
            title: "Write docs".into(),
            text: None,
            tags: vec![b, a, b],
        }
        .into_item(Uuid::now_v7(), Uuid::now_v7())
        .unwrap();
        assert_eq!(item.tags, vec![b, a]);
    }

    #[test]
    fn create_requires_list_and_title() {
        let user = Uuid::now_v7();
        let missing_list = CreateItem {
            list_id: None,
            title: "x".into(),
            text: None,
            tags: vec![],
        };
        assert_matches!(
            missing_list.into_item(Uuid::now_v7(), user),
            Err(CoreError::InvalidContent {
                reason: InvalidReason::MissingField("list_id"),
                ..
            })
        );
        let blank_title = CreateItem {
            list_id: Some(Uuid::now_v7()),
            title: "".into(),
            text: None,
            tags: vec![],
        };
        assert_matches!(
            blank_title.into_item(Uuid::now_v7(), user),
            Err(CoreError::InvalidContent {
                reason: InvalidReason::MissingField("title"),
                ..
            })
        );
    }

    #[test]
    fn patch_never_touches_links() {
        let before = Some(Uuid::now_v7());
        let mut item = Item {
            id: Uuid::now_v7(),
            list_id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            title: "a".into(),
            text: Some("old".into()),
            tags: vec![],
            before,
            after: None,
        };
        item.apply_patch(&ItemPatch {
            title: Some("b".into()),
            text: Some(None),
            tags: None,
        });
        assert_eq!(item.title, "b");
        assert_eq!(item.text, None);
        assert_eq!(item.before, before);
    }
}
