use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use taskboard_core::store::Store;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/resources
///
/// The tag catalog and the selectable colors.
pub async fn get_resources<S: Store>(
    _auth: AuthUser,
    State(state): State<AppState<S>>,
) -> AppResult<impl IntoResponse> {
    let resources = state.services.resources.resources().await?;
    Ok(Json(DataResponse { data: resources }))
}
