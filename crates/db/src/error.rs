use taskboard_core::error::{CoreError, ErrorContext};

/// PostgreSQL `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Map a sqlx error into the core taxonomy, attaching `context`.
///
/// - `RowNotFound` maps to `NotFound`.
/// - Unique constraint violations map to `Conflict`.
/// - Everything else maps to `Server`.
pub fn db_error(context: ErrorContext) -> impl FnOnce(sqlx::Error) -> CoreError {
    move |err| match &err {
        sqlx::Error::RowNotFound => CoreError::NotFound(context),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            CoreError::Conflict(context)
        }
        other => CoreError::server(context, other),
    }
}
