//! Taskboard domain core.
//!
//! Boards, lists and items each live in a linked chain ordered by
//! `before`/`after` pointers. This crate holds everything that keeps those
//! chains intact:
//!
//! - [`ordering`] -- chain repair on insert, delete and move, and chain
//!   materialization for reads.
//! - [`store`] -- the transactional persistence traits the repair engine runs on.
//! - [`managers`] -- validation, transactions and cascades per entity.
//! - [`memory`] -- an in-process [`store::Store`] used by tests.

pub mod error;
pub mod managers;
pub mod memory;
pub mod models;
pub mod ordering;
pub mod store;
pub mod types;

pub use error::{CoreError, ErrorContext, ErrorKind, InvalidReason};
pub use managers::Services;
pub use memory::MemoryStore;
