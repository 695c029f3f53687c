//! Session state and route guarding
//!
//! The session starts in `Loading` and settles once the startup `/me`
//! check finishes. Protected pages wait for that instead of bouncing a
//! returning user to the login page.

use crate::api::{ApiClient, ClientError};
use crate::storage::TokenStore;
use recipe_catalog_shared::UserProfile;
use uuid::Uuid;

/// Who the client believes is signed in
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Loading,
    Authenticated(UserProfile),
    Anonymous,
}

impl SessionState {
    /// Settle the session from the outcome of a `/me` call
    pub fn resolve(result: Result<UserProfile, ClientError>) -> Self {
        match result {
            Ok(profile) => SessionState::Authenticated(profile),
            Err(e) => {
                tracing::debug!(error = %e, "Session check failed");
                SessionState::Anonymous
            }
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            SessionState::Authenticated(profile) => Some(profile),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    /// Replace the signed-in user after a successful profile edit
    pub fn apply_profile_update(&mut self, profile: UserProfile) {
        *self = SessionState::Authenticated(profile);
    }

    /// Forget the token and drop to anonymous
    pub fn logout<S: TokenStore>(&mut self, api: &ApiClient<S>) {
        api.logout();
        *self = SessionState::Anonymous;
    }
}

/// Startup session check
///
/// Without a stored token no request is made. A rejected or failed `/me`
/// leaves the session anonymous.
pub async fn bootstrap<S: TokenStore>(api: &ApiClient<S>) -> SessionState {
    if !api.has_token() {
        return SessionState::Anonymous;
    }
    SessionState::resolve(api.me().await)
}

/// Client pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
    RecipeDetails(Uuid),
    FreezerLog,
    Login,
    Dashboard,
    AddRecipe,
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');

        match trimmed {
            "" => Route::Landing,
            "/freezer-logger" => Route::FreezerLog,
            "/auth/login" => Route::Login,
            "/dashboard" => Route::Dashboard,
            "/add-recipe" => Route::AddRecipe,
            other => other
                .strip_prefix("/recipe/")
                .and_then(|id| Uuid::parse_str(id).ok())
                .map(Route::RecipeDetails)
                .unwrap_or(Route::NotFound),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::RecipeDetails(id) => format!("/recipe/{}", id),
            Route::FreezerLog => "/freezer-logger".to_string(),
            Route::Login => "/auth/login".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::AddRecipe => "/add-recipe".to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Dashboard | Route::AddRecipe)
    }
}

/// What the router should do for a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    ShowLoading,
    Render(Route),
    Redirect(Route),
}

pub fn guard(session: &SessionState, route: Route) -> RouteDecision {
    match (session, route) {
        (SessionState::Loading, _) => RouteDecision::ShowLoading,
        (_, Route::NotFound) => RouteDecision::Redirect(Route::Landing),
        (SessionState::Authenticated(_), Route::Login) => RouteDecision::Redirect(Route::Landing),
        (SessionState::Anonymous, route) if route.requires_auth() => {
            RouteDecision::Redirect(Route::Login)
        }
        (_, route) => RouteDecision::Render(route),
    }
}
