//! Authentication routes
//!
//! Provides endpoints for registration, login and the current user's
//! profile. `/me` sits behind [`require_auth`].

use super::form::FormData;
use crate::auth::{require_auth, AuthUser};
use crate::error::ApiResult;
use crate::services::{ProfileInput, Registration, UserService};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use recipe_catalog_shared::{AuthResponse, LoginRequest, UserProfile};

/// Create auth routes
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(get_me).put(update_me))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .merge(protected)
}

/// Register a new user
///
/// POST /register (multipart: username, password, name, optional avatar)
async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let mut form = FormData::read(multipart).await?;
    let input = Registration {
        username: form.text("username"),
        password: form.text("password"),
        name: form.text("name"),
        avatar: form.take_file("avatar"),
    };

    let response =
        UserService::register(state.users.as_ref(), state.jwt(), state.passwords, input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with username and password
///
/// POST /login
///
/// A body that is not valid JSON is answered in the usual error envelope.
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(req) = payload?;
    let response = UserService::login(state.users.as_ref(), state.jwt(), &req).await?;
    Ok(Json(response))
}

/// Get the current user
///
/// GET /me
async fn get_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<UserProfile>> {
    let profile = UserService::get_profile(state.users.as_ref(), auth_user.user_id).await?;
    Ok(Json(profile))
}

/// Update the current user
///
/// PUT /me (multipart: name, username, optional avatar)
async fn update_me(
    State(state): State<AppState>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> ApiResult<Json<UserProfile>> {
    let mut form = FormData::read(multipart).await?;
    let input = ProfileInput {
        name: form.text("name"),
        username: form.text("username"),
        avatar: form.take_file("avatar"),
    };

    let profile =
        UserService::update_profile(state.users.as_ref(), auth_user.user_id, input).await?;
    Ok(Json(profile))
}
