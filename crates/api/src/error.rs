use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use taskboard_core::error::{CoreError, ErrorKind};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Renders as `{ "error": <message>, "code": <CODE> }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl AppError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Core(CoreError::Unauthorized(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Core(core) => match core.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::InvalidContent => StatusCode::BAD_REQUEST,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
                ErrorKind::Server => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            AppError::Core(core) => match core.kind() {
                ErrorKind::NotFound => ("NOT_FOUND", core.to_string()),
                ErrorKind::InvalidContent => ("VALIDATION_ERROR", core.to_string()),
                ErrorKind::Conflict => ("CONFLICT", core.to_string()),
                ErrorKind::Unauthorized => ("UNAUTHORIZED", core.to_string()),
                // Already logged by the manager that produced it.
                ErrorKind::Server => ("INTERNAL_ERROR", INTERNAL_MESSAGE.to_string()),
            },
            AppError::BadRequest(msg) => ("BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ("INTERNAL_ERROR", INTERNAL_MESSAGE.to_string())
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
