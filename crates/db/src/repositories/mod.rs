//! Repository layer: query functions over `&mut PgConnection`.
//!
//! Every repository is a zero-sized struct with async associated functions.
//! They return raw `sqlx::Error`s; mapping into `CoreError` happens in
//! [`crate::store`].

pub mod board_repo;
pub mod item_repo;
pub mod list_repo;
pub mod ordered_repo;
pub mod tag_repo;
pub mod user_repo;

pub use ordered_repo::{OrderedRepo, PgEntity};
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
