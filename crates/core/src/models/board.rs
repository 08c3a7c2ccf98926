//! Board entity model and DTOs.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ErrorContext, InvalidReason};
use crate::models::color::Color;
use crate::models::list::ListDetail;
use crate::models::{normalize_text, require_text};
use crate::ordering::{Links, Ordered};
use crate::types::{empty_as_none, is_empty_id, EntityId};

/// A board owned by one user. Boards are ordered per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub id: EntityId,
    pub user_id: EntityId,
    pub title: String,
    pub text: Option<String>,
    pub color: Color,
    pub before: Option<EntityId>,
    pub after: Option<EntityId>,
}

impl Ordered for Board {
    const KIND: &'static str = "board";
    type Patch = BoardPatch;

    fn id(&self) -> EntityId {
        self.id
    }

    fn owner_id(&self) -> EntityId {
        self.user_id
    }

    /// A board's chain is scoped by its owner.
    fn parent_id(&self) -> EntityId {
        self.user_id
    }

    // Boards never change owner.
    fn set_parent_id(&mut self, _parent_id: EntityId) {}

    fn links(&self) -> Links {
        Links::new(self.before, self.after)
    }

    fn set_links(&mut self, links: Links) {
        self.before = links.before;
        self.after = links.after;
    }

    fn apply_patch(&mut self, patch: &BoardPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
    }
}

/// DTO for creating a new board.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBoard {
    pub title: String,
    pub text: Option<String>,
    pub color: String,
}

impl CreateBoard {
    /// Validate and build the board to insert. Links are assigned on insert.
    pub fn into_board(self, id: EntityId, user_id: EntityId) -> Result<Board, CoreError> {
        let ctx = ErrorContext::new(Board::KIND, "create board").id(id).owner(user_id);
        if is_empty_id(user_id) {
            return Err(CoreError::invalid(ctx, InvalidReason::MissingField("user_id")));
        }
        require_text(&self.title, "title", &ctx)?;
        let color = parse_color(&self.color, &ctx)?;
        Ok(Board {
            id,
            user_id,
            title: self.title.trim().to_string(),
            text: normalize_text(self.text),
            color,
            before: None,
            after: None,
        })
    }
}

/// DTO for updating an existing board. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBoard {
    pub title: Option<String>,
    /// An empty string clears the text.
    pub text: Option<String>,
    pub color: Option<String>,
}

impl UpdateBoard {
    pub fn into_patch(self, ctx: &ErrorContext) -> Result<BoardPatch, CoreError> {
        if let Some(title) = &self.title {
            require_text(title, "title", ctx)?;
        }
        let color = self
            .color
            .as_deref()
            .map(|c| parse_color(c, ctx))
            .transpose()?;
        Ok(BoardPatch {
            title: self.title.map(|t| t.trim().to_string()),
            text: self.text.map(|t| normalize_text(Some(t))),
            color,
        })
    }
}

/// Validated non-positional board changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardPatch {
    pub title: Option<String>,
    pub text: Option<Option<String>>,
    pub color: Option<Color>,
}

/// Request body for repositioning a board.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoveBoard {
    /// New predecessor. `None` moves the board to the head.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub before: Option<EntityId>,
}

/// A board with its lists and their items, each level in chain order.
#[derive(Debug, Clone, Serialize)]
pub struct BoardDetail {
    #[serde(flatten)]
    pub board: Board,
    pub lists: Vec<ListDetail>,
}

fn parse_color(raw: &str, ctx: &ErrorContext) -> Result<Color, CoreError> {
    raw.parse::<Color>()
        .map_err(|reason| CoreError::invalid(ctx.clone(), reason))
}
