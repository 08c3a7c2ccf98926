//! Handlers for the `/lists` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use taskboard_core::models::{CreateList, MoveList, UpdateList};
use taskboard_core::store::Store;
use taskboard_core::types::EntityId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/lists
pub async fn create_list<S: Store>(
    auth: AuthUser,
    State(state): State<AppState<S>>,
    Json(input): Json<CreateList>,
) -> AppResult<impl IntoResponse> {
    let list = state.services.lists.create(auth.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: list })))
}

/// PATCH /api/v1/lists/{id}
pub async fn update_list<S: Store>(
    auth: AuthUser,
    State(state): State<AppState<S>>,
    Path(id): Path<EntityId>,
    Json(input): Json<UpdateList>,
) -> AppResult<impl IntoResponse> {
    let list = state.services.lists.update(auth.user_id, id, input).await?;
    Ok(Json(DataResponse { data: list }))
}

/// DELETE /api/v1/lists/{id}
pub async fn delete_list<S: Store>(
    auth: AuthUser,
    State(state): State<AppState<S>>,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    state.services.lists.delete(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/lists/{id}/move
///
/// `board_id` is optional; without it the list stays on its board.
pub async fn move_list<S: Store>(
    auth: AuthUser,
    State(state): State<AppState<S>>,
    Path(id): Path<EntityId>,
    Json(input): Json<MoveList>,
) -> AppResult<impl IntoResponse> {
    let list = state.services.lists.move_to(auth.user_id, id, input).await?;
    Ok(Json(DataResponse { data: list }))
}
