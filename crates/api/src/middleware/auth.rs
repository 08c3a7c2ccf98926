//! Session extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use taskboard_core::store::Store;
use taskboard_core::types::EntityId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Name of the cookie carrying the session token.
pub const TOKEN_COOKIE: &str = "token";

/// The signed-in user.
///
/// The token is read from `Authorization: Bearer <token>` first and from the
/// `token` cookie otherwise.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: EntityId,
}

impl<S: Store> FromRequestParts<AppState<S>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| cookie_token(parts))
            .ok_or_else(|| AppError::unauthorized("Missing session token"))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn cookie_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(header: (&str, &str)) -> Parts {
        let (parts, ()) = Request::builder()
            .header(header.0, header.1)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn reads_bearer_header() {
        let parts = parts(("authorization", "Bearer abc.def"));
        assert_eq!(bearer_token(&parts), Some("abc.def"));
        assert_eq!(cookie_token(&parts), None);
    }

    #[test]
    fn reads_token_among_other_cookies() {
        let parts = parts(("cookie", "theme=dark; token=abc.def; lang=en"));
        assert_eq!(cookie_token(&parts), Some("abc.def"));
    }

    #[test]
    fn empty_cookie_is_no_token() {
        let parts = parts(("cookie", "token="));
        assert_eq!(cookie_token(&parts), None);
    }
}
