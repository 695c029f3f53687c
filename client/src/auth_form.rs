//! Combined login / register form

use crate::api::{ApiClient, ClientError, RegisterInput, Upload};
use crate::session::Route;
use crate::storage::TokenStore;
use recipe_catalog_shared::PublicUser;

pub const MISSING_CREDENTIALS: &str = "Username and password are required.";
pub const MISSING_NAME: &str = "Full Name is required for registration.";
pub const INVALID_CREDENTIALS: &str = "Invalid login credentials.";
pub const SERVER_ERROR: &str = "Server error. Please try again later.";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn title(&self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Register => "Register",
        }
    }

    pub fn switch_prompt(&self) -> &'static str {
        match self {
            AuthMode::Login => "Don't have an account?",
            AuthMode::Register => "Already have an account?",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }
}

/// Client-side checks run before any request goes out
pub fn check_fields(
    mode: AuthMode,
    username: &str,
    password: &str,
    name: &str,
) -> Result<(), &'static str> {
    if username.trim().is_empty() || password.trim().is_empty() {
        return Err(MISSING_CREDENTIALS);
    }
    if mode == AuthMode::Register && name.trim().is_empty() {
        return Err(MISSING_NAME);
    }
    Ok(())
}

/// Message shown for a failed submit, keyed on the HTTP status
pub fn failure_message(status: Option<u16>, server_message: Option<&str>) -> String {
    match status {
        Some(401) => INVALID_CREDENTIALS.to_string(),
        Some(status) if status >= 500 => SERVER_ERROR.to_string(),
        Some(_) => server_message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(UNEXPECTED_ERROR)
            .to_string(),
        None => UNEXPECTED_ERROR.to_string(),
    }
}

fn describe(error: &ClientError) -> String {
    failure_message(error.status(), error.server_message())
}

/// Outcome of a successful submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSuccess {
    pub user: PublicUser,
    pub redirect: Route,
}

#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub username: String,
    pub password: String,
    pub name: String,
    pub avatar: Option<Upload>,
    error: Option<String>,
    loading: bool,
}

impl AuthForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch between login and register; clears the current error
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.other();
        self.error = None;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn submit_label(&self) -> &'static str {
        if self.loading {
            "Loading..."
        } else {
            self.mode.title()
        }
    }

    /// Validate, call the API and report where to go next
    ///
    /// On failure the error message is set, the loading flag is reset and
    /// `None` is returned. The token is persisted by the API client.
    pub async fn submit<S: TokenStore>(&mut self, api: &ApiClient<S>) -> Option<AuthSuccess> {
        self.error = None;

        if let Err(message) = check_fields(self.mode, &self.username, &self.password, &self.name) {
            self.error = Some(message.to_string());
            return None;
        }

        self.loading = true;
        let result = match self.mode {
            AuthMode::Login => api.login(&self.username, &self.password).await,
            AuthMode::Register => {
                api.register(RegisterInput {
                    username: self.username.clone(),
                    password: self.password.clone(),
                    name: self.name.clone(),
                    avatar: self.avatar.clone(),
                })
                .await
            }
        };
        self.loading = false;

        match result {
            Ok(auth) => Some(AuthSuccess {
                user: auth.user,
                redirect: Route::Landing,
            }),
            Err(e) => {
                tracing::error!(error = %e, mode = self.mode.title(), "Authentication failed");
                self.error = Some(describe(&e));
                None
            }
        }
    }
}
