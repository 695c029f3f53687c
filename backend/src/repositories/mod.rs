//! Database repositories
//!
//! The application talks to storage through two traits, [`CredentialStore`]
//! and [`RecipeStore`]. [`PgStore`] implements both on PostgreSQL;
//! [`MemoryStore`] implements both in process for tests and demo runs.
//!
//! Every write touches exactly one row, so no operation needs a
//! multi-statement transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recipe_catalog_shared::Category;
use sqlx::error::ErrorKind;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod recipe;
pub mod user;

pub use memory::MemoryStore;
pub use recipe::DEFAULT_CATEGORIES;

/// Store failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("username already taken")]
    DuplicateUsername,

    #[error("unknown category {0}")]
    UnknownCategory(i32),

    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Replacement for a stored binary column
///
/// `Keep` leaves the stored bytes untouched; the column is never cleared
/// as a side effect of an update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BlobUpdate {
    #[default]
    Keep,
    Replace(Vec<u8>),
}

impl BlobUpdate {
    /// `Replace` for a non-empty upload, `Keep` otherwise
    pub fn from_upload(bytes: Option<Vec<u8>>) -> Self {
        match bytes {
            Some(bytes) if !bytes.is_empty() => BlobUpdate::Replace(bytes),
            _ => BlobUpdate::Keep,
        }
    }

    /// Bytes to write, `None` when the stored value is kept
    pub fn into_replacement(self) -> Option<Vec<u8>> {
        match self {
            BlobUpdate::Keep => None,
            BlobUpdate::Replace(bytes) => Some(bytes),
        }
    }
}

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub name: String,
    pub avatar: Option<Vec<u8>>,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub name: String,
    pub avatar: Option<Vec<u8>>,
}

/// Input for updating a user's profile
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub name: String,
    pub username: String,
    pub avatar: BlobUpdate,
}

/// Recipe record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeRecord {
    pub id: Uuid,
    pub name: String,
    pub image: Option<Vec<u8>>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub category_id: Option<i32>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a recipe
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub image: Option<Vec<u8>>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub category_id: Option<i32>,
    pub user_id: Option<Uuid>,
}

/// Input for updating a recipe
#[derive(Debug, Clone)]
pub struct RecipeUpdate {
    pub name: String,
    pub image: BlobUpdate,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub category_id: Option<i32>,
}

/// Storage for user identities
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a user; fails with `DuplicateUsername` if the name is taken
    async fn create(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError>;

    /// Update name, username and (optionally) avatar; `NotFound` if the id is gone
    async fn update(&self, id: Uuid, update: ProfileUpdate) -> Result<UserRecord, StoreError>;

    /// Check the store is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Storage for the recipe catalog
#[async_trait]
pub trait RecipeStore: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// All recipes, newest first
    async fn list_recipes(&self) -> Result<Vec<RecipeRecord>, StoreError>;

    async fn find_recipe(&self, id: Uuid) -> Result<Option<RecipeRecord>, StoreError>;

    async fn create_recipe(&self, recipe: NewRecipe) -> Result<RecipeRecord, StoreError>;

    async fn update_recipe(
        &self,
        id: Uuid,
        update: RecipeUpdate,
    ) -> Result<RecipeRecord, StoreError>;

    async fn delete_recipe(&self, id: Uuid) -> Result<(), StoreError>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Constraint names from the initial migration
const USERNAME_UNIQUE: &str = "admin_username_key";
const RECIPE_CATEGORY_FK: &str = "recipe_category_id_fkey";

/// Translate constraint violations into store errors
fn map_constraint(err: sqlx::Error, category_id: Option<i32>) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if let Some(mapped) = constraint_error(db_err.kind(), db_err.constraint(), category_id) {
            return mapped;
        }
    }
    StoreError::Database(err)
}

/// Only the username and recipe category constraints have a domain meaning;
/// anything else stays a database error
fn constraint_error(
    kind: ErrorKind,
    constraint: Option<&str>,
    category_id: Option<i32>,
) -> Option<StoreError> {
    match (kind, constraint) {
        (ErrorKind::UniqueViolation, Some(USERNAME_UNIQUE)) => Some(StoreError::DuplicateUsername),
        (ErrorKind::ForeignKeyViolation, Some(RECIPE_CATEGORY_FK)) => {
            category_id.map(StoreError::UnknownCategory)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_upload_keeps_blob() {
        assert_eq!(BlobUpdate::from_upload(None), BlobUpdate::Keep);
        assert_eq!(BlobUpdate::from_upload(Some(Vec::new())), BlobUpdate::Keep);
        assert_eq!(
            BlobUpdate::from_upload(Some(vec![1, 2])),
            BlobUpdate::Replace(vec![1, 2])
        );
    }

    #[test]
    fn test_constraint_error_names_the_violated_constraint() {
        assert!(matches!(
            constraint_error(ErrorKind::UniqueViolation, Some(USERNAME_UNIQUE), None),
            Some(StoreError::DuplicateUsername)
        ));
        assert!(matches!(
            constraint_error(ErrorKind::ForeignKeyViolation, Some(RECIPE_CATEGORY_FK), Some(99)),
            Some(StoreError::UnknownCategory(99))
        ));
        assert!(constraint_error(
            ErrorKind::ForeignKeyViolation,
            Some("recipe_user_id_fkey"),
            Some(99)
        )
        .is_none());
        assert!(constraint_error(ErrorKind::UniqueViolation, Some("recipe_pkey"), None).is_none());
    }

    #[test]
    fn test_into_replacement() {
        assert_eq!(BlobUpdate::Keep.into_replacement(), None);
        assert_eq!(
            BlobUpdate::Replace(vec![9]).into_replacement(),
            Some(vec![9])
        );
    }
}
