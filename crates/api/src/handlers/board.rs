//! Handlers for the `/boards` resource.
//!
//! Every endpoint acts on the signed-in user's boards only; a board owned by
//! someone else is reported as missing.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use taskboard_core::models::{CreateBoard, MoveBoard, UpdateBoard};
use taskboard_core::store::Store;
use taskboard_core::types::EntityId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/boards
pub async fn list_boards<S: Store>(
    auth: AuthUser,
    State(state): State<AppState<S>>,
) -> AppResult<impl IntoResponse> {
    let boards = state.services.boards.list(auth.user_id).await?;
    Ok(Json(DataResponse { data: boards }))
}

/// POST /api/v1/boards
///
/// The new board goes to the end of the user's boards.
pub async fn create_board<S: Store>(
    auth: AuthUser,
    State(state): State<AppState<S>>,
    Json(input): Json<CreateBoard>,
) -> AppResult<impl IntoResponse> {
    let board = state.services.boards.create(auth.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: board })))
}

/// GET /api/v1/boards/{id}
///
/// The board with its lists and their items, each level in display order.
pub async fn get_board<S: Store>(
    auth: AuthUser,
    State(state): State<AppState<S>>,
    Path(id): Path<EntityId>,
) -> AppResult<impl IntoResponse> {
    let detail = state.services.boards.get(auth.user_id, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PATCH /api/v1/boards/{id}
pub async fn update_board<S: Store>(
    auth: AuthUser,
    State(state): State<AppState<S>>,
    Path(id): Path<EntityId>,
    Json(input): Json<UpdateBoard>,
) -> AppResult<impl IntoResponse> {
    let board = state.services.boards.update(auth.user_id, id, input).await?;
    Ok(Json(DataResponse { data: board }))
}

/// DELETE /api/v1/boards/{id}
///
/// Removes the board's lists and items too.
pub async fn delete_board<S: Store>(
    auth: AuthUser,
    State(state): State<AppState<S>>,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    state.services.boards.delete(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/boards/{id}/move
pub async fn move_board<S: Store>(
    auth: AuthUser,
    State(state): State<AppState<S>>,
    Path(id): Path<EntityId>,
    Json(input): Json<MoveBoard>,
) -> AppResult<impl IntoResponse> {
    let board = state.services.boards.move_to(auth.user_id, id, input).await?;
    Ok(Json(DataResponse { data: board }))
}
