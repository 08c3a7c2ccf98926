use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use taskboard_core::store::Store;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when storage is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /health
async fn health_check<S: Store>(State(state): State<AppState<S>>) -> Json<HealthResponse> {
    let db_healthy = state.services.health_check().await.is_ok();
    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router<S: Store>() -> Router<AppState<S>> {
    Router::new().route("/health", get(health_check::<S>))
}
