use axum::routing::get;
use axum::Router;
use taskboard_core::store::Store;

use crate::handlers::resource;
use crate::state::AppState;

pub fn router<S: Store>() -> Router<AppState<S>> {
    Router::new().route("/resources", get(resource::get_resources::<S>))
}
