//! Row types for every table, with conversions into domain entities.
//!
//! Rows carry the bookkeeping columns (`created_at`, `updated_at`) that the
//! domain types leave out.

pub mod board;
pub mod item;
pub mod list;
pub mod tag;
pub mod user;

pub use board::BoardRow;
pub use item::ItemRow;
pub use list::ListRow;
pub use tag::TagRow;
pub use user::UserRow;

use taskboard_core::error::{CoreError, ErrorContext};
use taskboard_core::models::Color;

/// Parse a stored color. The column is CHECK-constrained, so a failure means
/// the schema and the code disagree.
pub(crate) fn stored_color(raw: &str, ctx: ErrorContext) -> Result<Color, CoreError> {
    raw.parse::<Color>()
        .map_err(|reason| CoreError::server(ctx, reason))
}
