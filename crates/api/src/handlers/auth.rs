//! Handlers for the `/auth` resource (sign up, sign in, sign out).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskboard_core::error::ErrorKind;
use taskboard_core::models::{NewUser, User};
use taskboard_core::store::Store;

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::TOKEN_COOKIE;
use crate::response::DataResponse;
use crate::state::AppState;

const BAD_CREDENTIALS: &str = "Invalid name or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for both `POST /auth/signup` and `POST /auth/signin`.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
pub async fn sign_up<S: Store>(
    State(state): State<AppState<S>>,
    Json(input): Json<Credentials>,
) -> AppResult<impl IntoResponse> {
    if input.password.is_empty() {
        return Err(AppError::BadRequest("Password must not be empty".into()));
    }
    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = state
        .services
        .users
        .sign_up(NewUser {
            name: input.name,
            password_hash,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// POST /api/v1/auth/signin
///
/// Returns the session token in the body and sets it as the `token` cookie.
pub async fn sign_in<S: Store>(
    State(state): State<AppState<S>>,
    Json(input): Json<Credentials>,
) -> AppResult<impl IntoResponse> {
    let user = match state.services.users.find_by_name(&input.name).await {
        Ok(user) => user,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(AppError::unauthorized(BAD_CREDENTIALS));
        }
        Err(err) => return Err(err.into()),
    };

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::unauthorized(BAD_CREDENTIALS));
    }

    let jwt = &state.config.jwt;
    let token = generate_token(user.id, jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let cookie = session_cookie(&token, jwt.expiry_secs());

    tracing::info!(user_id = %user.id, "User signed in");

    Ok((
        [(SET_COOKIE, cookie)],
        Json(DataResponse {
            data: SessionResponse { token, user },
        }),
    ))
}

/// POST /api/v1/auth/signout
///
/// Expires the session cookie. Bearer tokens simply lapse.
pub async fn sign_out() -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, session_cookie("", 0))],
    )
}

fn session_cookie(value: &str, max_age: i64) -> String {
    format!("{TOKEN_COOKIE}={value}; HttpOnly; SameSite=Strict; Path=/; Max-Age={max_age}")
}
