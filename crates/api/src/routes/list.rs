use axum::routing::{patch, post};
use axum::Router;
use taskboard_core::store::Store;

use crate::handlers::list;
use crate::state::AppState;

/// Routes mounted at `/lists`.
pub fn router<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/", post(list::create_list::<S>))
        .route(
            "/{id}",
            patch(list::update_list::<S>).delete(list::delete_list::<S>),
        )
        .route("/{id}/move", patch(list::move_list::<S>))
}
