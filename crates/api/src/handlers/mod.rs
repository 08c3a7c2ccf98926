pub mod auth;
pub mod board;
pub mod item;
pub mod list;
pub mod resource;
