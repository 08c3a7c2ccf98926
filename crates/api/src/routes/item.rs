use axum::routing::{patch, post};
use axum::Router;
use taskboard_core::store::Store;

use crate::handlers::item;
use crate::state::AppState;

/// Routes mounted at `/items`.
pub fn router<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/", post(item::create_item::<S>))
        .route(
            "/{id}",
            patch(item::update_item::<S>).delete(item::delete_item::<S>),
        )
        .route("/{id}/move", patch(item::move_item::<S>))
}
