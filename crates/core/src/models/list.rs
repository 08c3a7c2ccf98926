//! List entity model and DTOs.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ErrorContext, InvalidReason};
use crate::models::item::Item;
use crate::models::require_text;
use crate::ordering::{Links, Ordered};
use crate::types::{empty_as_none, is_empty_id, EntityId};

/// A list on a board. Lists are ordered per `(board, owner)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct List {
    pub id: EntityId,
    pub board_id: EntityId,
    pub user_id: EntityId,
    pub title: String,
    pub before: Option<EntityId>,
    pub after: Option<EntityId>,
}

impl Ordered for List {
    const KIND: &'static str = "list";
    type Patch = ListPatch;

    fn id(&self) -> EntityId {
        self.id
    }

    fn owner_id(&self) -> EntityId {
        self.user_id
    }

    fn parent_id(&self) -> EntityId {
        self.board_id
    }

    fn set_parent_id(&mut self, parent_id: EntityId) {
        self.board_id = parent_id;
    }

    fn links(&self) -> Links {
        Links::new(self.before, self.after)
    }

    fn set_links(&mut self, links: Links) {
        self.before = links.before;
        self.after = links.after;
    }

    fn apply_patch(&mut self, patch: &ListPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
    }
}

/// DTO for creating a new list.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateList {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub board_id: Option<EntityId>,
    pub title: String,
}

impl CreateList {
    pub fn into_list(self, id: EntityId, user_id: EntityId) -> Result<List, CoreError> {
        let ctx = ErrorContext::new(List::KIND, "create list").id(id).owner(user_id);
        if is_empty_id(user_id) {
            return Err(CoreError::invalid(ctx, InvalidReason::MissingField("user_id")));
        }
        let board_id = self
            .board_id
            .filter(|b| !is_empty_id(*b))
            .ok_or_else(|| {
                CoreError::invalid(ctx.clone(), InvalidReason::MissingField("board_id"))
            })?;
        require_text(&self.title, "title", &ctx)?;
        Ok(List {
            id,
            board_id,
            user_id,
            title: self.title.trim().to_string(),
            before: None,
            after: None,
        })
    }
}

/// DTO for updating an existing list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateList {
    pub title: Option<String>,
}

impl UpdateList {
    pub fn into_patch(self, ctx: &ErrorContext) -> Result<ListPatch, CoreError> {
        if let Some(title) = &self.title {
            require_text(title, "title", ctx)?;
        }
        Ok(ListPatch {
            title: self.title.map(|t| t.trim().to_string()),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPatch {
    pub title: Option<String>,
}

/// Request body for repositioning a list, optionally onto another board.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoveList {
    /// Target board. `None` keeps the current board.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub board_id: Option<EntityId>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub before: Option<EntityId>,
}

/// A list with its items in chain order.
#[derive(Debug, Clone, Serialize)]
pub struct ListDetail {
    #[serde(flatten)]
    pub list: List,
    pub items: Vec<Item>,
}
