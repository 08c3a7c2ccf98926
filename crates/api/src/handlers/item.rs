//! Handlers for the `/items` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use taskboard_core::models::{CreateItem, MoveItem, UpdateItem};
use taskboard_core::store::Store;
use taskboard_core::types::EntityId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/items
pub async fn create_item<S: Store>(
    auth: AuthUser,
    State(state): State<AppState<S>>,
    Json(input): Json<CreateItem>,
) -> AppResult<impl IntoResponse> {
    let item = state.services.items.create(auth.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PATCH /api/v1/items/{id}
///
/// `tags`, when present, replaces the whole tag set.
pub async fn update_item<S: Store>(
    auth: AuthUser,
    State(state): State<AppState<S>>,
    Path(id): Path<EntityId>,
    Json(input): Json<UpdateItem>,
) -> AppResult<impl IntoResponse> {
    let item = state.services.items.update(auth.user_id, id, input).await?;
    Ok(Json(DataResponse { data: item }))
}

/// DELETE /api/v1/items/{id}
pub async fn delete_item<S: Store>(
    auth: AuthUser,
    State(state): State<AppState<S>>,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    state.services.items.delete(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/items/{id}/move
pub async fn move_item<S: Store>(
    auth: AuthUser,
    State(state): State<AppState<S>>,
    Path(id): Path<EntityId>,
    Json(input): Json<MoveItem>,
) -> AppResult<impl IntoResponse> {
    let item = state.services.items.move_to(auth.user_id, id, input).await?;
    Ok(Json(DataResponse { data: item }))
}
