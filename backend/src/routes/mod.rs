//! Route definitions for the Recipe Catalog API
//!
//! This module organizes all API routes and applies middleware.

use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod auth;
mod form;
mod health;
mod recipes;


pub use auth::auth_routes;
pub use recipes::recipe_routes;

/// Build the application router
///
/// Auth endpoints are served at the root (`/register`, `/login`, `/me`)
/// and again under `/auth`. Recipe endpoints live under `/api`.
pub fn create_router(state: AppState) -> Router {
    let server = &state.config().server;
    let timeout = Duration::from_secs(server.request_timeout_secs);
    let body_limit = state.config().uploads.max_body_bytes;

    Router::new()
        .merge(health::health_routes())
        .merge(auth::auth_routes(state.clone()))
        .nest("/auth", auth::auth_routes(state.clone()))
        .nest("/api", recipes::recipe_routes())
        // Replaces axum's 2 MB default
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(timeout))
        .layer(cors())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the browser client; tokens travel in the Authorization header
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
