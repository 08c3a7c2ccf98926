pub mod auth;
pub mod board;
pub mod health;
pub mod item;
pub mod list;
pub mod resource;

use axum::Router;
use taskboard_core::store::Store;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/signup                       sign up (public)
/// /auth/signin                       sign in (public)
/// /auth/signout                      sign out (public)
///
/// /boards                            list, create
/// /boards/{id}                       get (with lists and items), update, delete
/// /boards/{id}/move                  reposition
///
/// /lists                             create
/// /lists/{id}                        update, delete
/// /lists/{id}/move                   reposition, optionally onto another board
///
/// /items                             create
/// /items/{id}                        update, delete
/// /items/{id}/move                   reposition, optionally into another list
///
/// /resources                         tag catalog and colors
/// ```
pub fn api_routes<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/boards", board::router())
        .nest("/lists", list::router())
        .nest("/items", item::router())
        .merge(resource::router())
}
