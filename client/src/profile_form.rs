//! Edit-profile modal

use crate::api::{ApiClient, ProfileChanges, Upload};
use crate::auth_form::failure_message;
use crate::session::SessionState;
use crate::storage::TokenStore;
use recipe_catalog_shared::validation::validate_profile;
use recipe_catalog_shared::UserProfile;

#[derive(Debug, Clone, Default)]
pub struct ProfileEditor {
    open: bool,
    pub name: String,
    pub username: String,
    file: Option<Upload>,
    has_avatar: bool,
    error: Option<String>,
}

impl ProfileEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the modal pre-filled with the current user
    pub fn open(&mut self, user: &UserProfile) {
        self.open = true;
        self.name = user.name.clone();
        self.username = user.username.clone();
        self.file = None;
        self.has_avatar = user.avatar.is_some();
        self.error = None;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.file = None;
        self.error = None;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn select_file(&mut self, upload: Upload) {
        self.file = Some(upload);
    }

    /// Caption for the avatar drop zone
    pub fn file_label(&self) -> &str {
        match &self.file {
            Some(upload) => &upload.file_name,
            None if self.has_avatar => "Replace Avatar",
            None => "Click or Drag an Avatar Here",
        }
    }

    /// Send the changes; on success the session user is replaced and the
    /// modal closes
    pub async fn save<S: TokenStore>(
        &mut self,
        api: &ApiClient<S>,
        session: &mut SessionState,
    ) -> bool {
        self.error = None;

        if let Err(e) = validate_profile(&self.name, &self.username) {
            self.error = Some(e.message);
            return false;
        }

        let changes = ProfileChanges {
            name: self.name.trim().to_string(),
            username: self.username.trim().to_string(),
            avatar: self.file.clone(),
        };

        match api.update_profile(changes).await {
            Ok(profile) => {
                session.apply_profile_update(profile);
                self.close();
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Error updating profile");
                self.error = Some(failure_message(e.status(), e.server_message()));
                false
            }
        }
    }
}
