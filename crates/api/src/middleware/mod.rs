//! Request extractors.
//!
//! - [`auth::AuthUser`] -- resolves the signed-in user from a session token.

pub mod auth;
