//! Domain entities and their request DTOs.
//!
//! Each submodule contains:
//! - The entity struct exchanged between managers and stores (a value copy)
//! - A `Deserialize` create DTO
//! - A `Deserialize` update DTO (all `Option` fields) and the validated patch
//!   the store persists

pub mod board;
pub mod color;
pub mod item;
pub mod list;
pub mod tag;
pub mod user;

pub use board::{Board, BoardDetail, BoardPatch, CreateBoard, MoveBoard, UpdateBoard};
pub use color::Color;
pub use item::{CreateItem, Item, ItemPatch, MoveItem, UpdateItem};
pub use list::{CreateList, List, ListDetail, ListPatch, MoveList, UpdateList};
pub use tag::{Tag, TagFilter, TagPalette, TagSeed};
pub use user::{NewUser, User, UserFilter};

use crate::error::{CoreError, ErrorContext, InvalidReason};

/// Require a non-blank string field.
pub(crate) fn require_text(
    value: &str,
    field: &'static str,
    context: &ErrorContext,
) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::invalid(
            context.clone(),
            InvalidReason::MissingField(field),
        ));
    }
    Ok(())
}

/// Normalize free text: blank text is stored as `NULL`.
pub(crate) fn normalize_text(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}
