use axum::routing::post;
use axum::Router;
use taskboard_core::store::Store;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
pub fn router<S: Store>() -> Router<AppState<S>> {
    Router::new()
        .route("/signup", post(auth::sign_up::<S>))
        .route("/signin", post(auth::sign_in::<S>))
        .route("/signout", post(auth::sign_out))
}
