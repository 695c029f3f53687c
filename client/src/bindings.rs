//! JavaScript bindings for the form and display helpers

use crate::auth_form::{self, AuthMode};
use crate::catalog;
use crate::session::{guard, Route, RouteDecision, SessionState};
use recipe_catalog_shared::UserProfile;
use wasm_bindgen::prelude::*;

/// Client-side auth form check; returns the error to show, if any
#[wasm_bindgen(js_name = authFormError)]
pub fn auth_form_error(
    register: bool,
    username: &str,
    password: &str,
    name: &str,
) -> Option<String> {
    let mode = if register {
        AuthMode::Register
    } else {
        AuthMode::Login
    };
    auth_form::check_fields(mode, username, password, name)
        .err()
        .map(str::to_string)
}

/// Message for a failed login/register response
#[wasm_bindgen(js_name = authFailureMessage)]
pub fn auth_failure_message(status: u16, server_message: Option<String>) -> String {
    auth_form::failure_message(Some(status), server_message.as_deref())
}

#[wasm_bindgen(js_name = recipeCountLabel)]
pub fn recipe_count_label(count: usize) -> String {
    catalog::recipe_count_label(count)
}

/// Route guard for a path: the path to redirect to, or `undefined` when
/// the page can render. `user_json` is the `/me` body, or `undefined` for
/// an anonymous session. Call only once the session check has finished.
#[wasm_bindgen(js_name = guardRedirect)]
pub fn guard_redirect(path: &str, user_json: Option<String>) -> Option<String> {
    let session = user_json
        .and_then(|json| serde_json::from_str::<UserProfile>(&json).ok())
        .map(SessionState::Authenticated)
        .unwrap_or(SessionState::Anonymous);
    match guard(&session, Route::parse(path)) {
        RouteDecision::Redirect(target) => Some(target.path()),
        _ => None,
    }
}
