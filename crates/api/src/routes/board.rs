use axum::routing::{get, patch};
use axum::Router;
use taskboard_core::store::Store;

use crate::handlers::board;
use crate::state::AppState;

/// Routes mounted at `/boards`.
///
/// ```text
/// GET    /            -> list_boards
/// POST   /            -> create_board
/// GET    /{id}        -> get_board
/// PATCH  /{id}        -> update_board
/// DELETE /{id}        -> delete_board
/// PATCH  /{id}/move   -> move_board
/// ```
pub fn router<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route(
            "/",
            get(board::list_boards::<S>).post(board::create_board::<S>),
        )
        .route(
            "/{id}",
            get(board::get_board::<S>)
                .patch(board::update_board::<S>)
                .delete(board::delete_board::<S>),
        )
        .route("/{id}/move", patch(board::move_board::<S>))
}
