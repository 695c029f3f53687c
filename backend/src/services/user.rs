//! User service for authentication and profile management
//!
//! Password hashing and verification run on the blocking thread pool.
//! Login collapses "no such user" and "wrong password" into one error so
//! the response never reveals whether a username exists.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::media;
use crate::repositories::{
    BlobUpdate, CredentialStore, NewUser, ProfileUpdate, StoreError, UserRecord,
};
use recipe_catalog_shared::validation::{validate_profile, validate_registration};
use recipe_catalog_shared::{AuthResponse, LoginRequest, PublicUser, UserProfile};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid login credentials.";
const USER_NOT_FOUND: &str = "User not found.";

/// Fields submitted by the register form
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub name: String,
    pub avatar: Option<Vec<u8>>,
}

/// Fields submitted by the edit-profile form
#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub name: String,
    pub username: String,
    pub avatar: Option<Vec<u8>>,
}

/// User service for authentication operations
pub struct UserService;

impl UserService {
    /// Register a new user and issue a token for it
    pub async fn register(
        store: &dyn CredentialStore,
        jwt: &JwtService,
        passwords: PasswordService,
        input: Registration,
    ) -> Result<AuthResponse, ApiError> {
        validate_registration(&input.username, &input.password, &input.name)?;

        let password_hash = passwords
            .hash_async(input.password)
            .await
            .map_err(ApiError::Internal)?;

        let user = store
            .create(NewUser {
                username: input.username.trim().to_string(),
                password_hash,
                name: input.name.trim().to_string(),
                avatar: input.avatar.filter(|bytes| !bytes.is_empty()),
            })
            .await?;

        let token = jwt.issue(user.id).map_err(|e| ApiError::Internal(e.into()))?;

        metrics::counter!("auth_registrations_total").increment(1);
        info!(user_id = %user.id, "User registered");

        Ok(AuthResponse {
            token,
            user: public_user(&user),
        })
    }

    /// Check a username/password pair and issue a token
    pub async fn login(
        store: &dyn CredentialStore,
        jwt: &JwtService,
        credentials: &LoginRequest,
    ) -> Result<AuthResponse, ApiError> {
        let rejected = || {
            metrics::counter!("auth_logins_total", "outcome" => "rejected").increment(1);
            ApiError::Unauthorized(INVALID_CREDENTIALS.to_string())
        };

        if credentials.validate().is_err() {
            return Err(rejected());
        }

        // Stored usernames are trimmed at register and profile update
        let username = credentials.username.trim();
        let Some(user) = store.find_by_username(username).await? else {
            return Err(rejected());
        };

        let valid =
            PasswordService::verify_async(credentials.password.clone(), user.password_hash.clone())
                .await
                .map_err(ApiError::Internal)?;

        if !valid {
            return Err(rejected());
        }

        let token = jwt.issue(user.id).map_err(|e| ApiError::Internal(e.into()))?;

        metrics::counter!("auth_logins_total", "outcome" => "success").increment(1);
        info!(user_id = %user.id, "User logged in");

        Ok(AuthResponse {
            token,
            user: public_user(&user),
        })
    }

    /// Look up the profile for an authenticated user
    pub async fn get_profile(
        store: &dyn CredentialStore,
        user_id: Uuid,
    ) -> Result<UserProfile, ApiError> {
        let user = store.find_by_id(user_id).await?.ok_or_else(|| {
            warn!(user_id = %user_id, "Token subject no longer exists");
            ApiError::NotFound(USER_NOT_FOUND.to_string())
        })?;

        Ok(to_profile(user))
    }

    /// Update name and username, replacing the avatar only when a new one is uploaded
    pub async fn update_profile(
        store: &dyn CredentialStore,
        user_id: Uuid,
        input: ProfileInput,
    ) -> Result<UserProfile, ApiError> {
        validate_profile(&input.name, &input.username)?;

        let update = ProfileUpdate {
            name: input.name.trim().to_string(),
            username: input.username.trim().to_string(),
            avatar: BlobUpdate::from_upload(input.avatar),
        };

        let user = store.update(user_id, update).await.map_err(|e| match e {
            StoreError::NotFound => ApiError::NotFound(USER_NOT_FOUND.to_string()),
            other => other.into(),
        })?;

        info!(user_id = %user.id, "Profile updated");
        Ok(to_profile(user))
    }
}

fn public_user(user: &UserRecord) -> PublicUser {
    PublicUser {
        id: user.id,
        username: user.username.clone(),
        name: user.name.clone(),
    }
}

fn to_profile(user: UserRecord) -> UserProfile {
    UserProfile {
        avatar: media::optional_data_uri(user.avatar.as_deref()),
        id: user.id,
        username: user.username,
        name: user.name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PasswordAlgorithm;
    use crate::repositories::MemoryStore;

    fn services() -> (MemoryStore, JwtService, PasswordService) {
        (
            MemoryStore::new(),
            JwtService::new("test-secret", 3600),
            PasswordService::new(PasswordAlgorithm::Bcrypt, 4),
        )
    }

    fn credentials(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn alice() -> Registration {
        Registration {
            username: "alice".to_string(),
            password: "pw123".to_string(),
            name: "Alice A".to_string(),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (store, jwt, passwords) = services();

        let registered = UserService::register(&store, &jwt, passwords, alice())
            .await
            .unwrap();
        assert_eq!(jwt.verify(&registered.token).unwrap(), registered.user.id);

        let logged_in = UserService::login(&store, &jwt, &credentials("alice", "pw123"))
            .await
            .unwrap();
        assert_eq!(logged_in.user, registered.user);
        assert_eq!(jwt.verify(&logged_in.token).unwrap(), registered.user.id);
    }

    #[tokio::test]
    async fn test_password_is_hashed() {
        let (store, jwt, passwords) = services();
        UserService::register(&store, &jwt, passwords, alice())
            .await
            .unwrap();

        let stored = store.find_by_username("alice").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "pw123");
        assert!(PasswordService::verify("pw123", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_second_register_conflicts() {
        let (store, jwt, passwords) = services();
        UserService::register(&store, &jwt, passwords, alice())
            .await
            .unwrap();

        let err = UserService::register(&store, &jwt, passwords, alice())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_login_errors_are_indistinguishable() {
        let (store, jwt, passwords) = services();
        UserService::register(&store, &jwt, passwords, alice())
            .await
            .unwrap();

        let wrong_password = UserService::login(&store, &jwt, &credentials("alice", "nope"))
            .await
            .unwrap_err();
        let unknown_user = UserService::login(&store, &jwt, &credentials("mallory", "pw123"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
        assert!(matches!(wrong_password, ApiError::Unauthorized(_)));

        let blank = UserService::login(&store, &jwt, &credentials("alice", ""))
            .await
            .unwrap_err();
        assert_eq!(blank.to_string(), wrong_password.to_string());
    }

    #[tokio::test]
    async fn test_profile_for_deleted_user() {
        let (store, _, _) = services();
        let err = UserService::get_profile(&store, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_profile_coalesces_avatar() {
        let (store, jwt, passwords) = services();
        let registered = UserService::register(
            &store,
            &jwt,
            passwords,
            Registration {
                avatar: Some(vec![0xff, 0xd8, 0xff]),
                ..alice()
            },
        )
        .await
        .unwrap();

        let profile = UserService::update_profile(
            &store,
            registered.user.id,
            ProfileInput {
                name: "Alice B".to_string(),
                username: "alice".to_string(),
                avatar: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(profile.name, "Alice B");
        assert_eq!(profile.avatar.as_deref(), Some("data:image/jpeg;base64,/9j/"));
    }

    #[tokio::test]
    async fn test_update_profile_requires_fields() {
        let (store, _, _) = services();
        let err = UserService::update_profile(&store, Uuid::new_v4(), ProfileInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
