//! Authentication middleware
//!
//! A request either resolves to an [`AuthUser`] and proceeds, or is
//! rejected with 401 before the handler runs. A missing header, a header
//! with another scheme and a token that fails verification all produce the
//! same rejection. The scheme name is matched case-insensitively.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

const REJECTION: &str = "Missing, invalid or expired token";

/// Authenticated user resolved from the bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Resolve the bearer token in `headers` to a user
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .map(str::trim)
        .filter(|token| !token.is_empty());

    let Some(token) = token else {
        metrics::counter!("auth_token_rejections_total", "reason" => "missing").increment(1);
        return Err(ApiError::Unauthorized(REJECTION.to_string()));
    };

    let user_id = state.jwt().verify(token).map_err(|_| {
        metrics::counter!("auth_token_rejections_total", "reason" => "invalid").increment(1);
        ApiError::Unauthorized(REJECTION.to_string())
    })?;

    Ok(AuthUser { user_id })
}

/// Token part of an `Authorization: Bearer <token>` value
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    scheme.eq_ignore_ascii_case("bearer").then_some(token)
}

/// Extractor for handlers behind a bearer token
///
/// Reuses the identity attached by [`require_auth`] when the route sits
/// behind it, and verifies the header itself otherwise.
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(*user);
        }

        let app_state = AppState::from_ref(state);
        authenticate(&app_state, &parts.headers)
    }
}

/// Middleware that rejects unauthenticated requests for a group of routes
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, request.headers())?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
