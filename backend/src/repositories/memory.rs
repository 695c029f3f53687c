//! In-process store
//!
//! Implements both store traits over maps behind a `RwLock`. Used by the
//! test suites and by `--in-memory` demo runs; data is lost on exit.

use super::{
    BlobUpdate, CredentialStore, NewRecipe, NewUser, ProfileUpdate, RecipeRecord, RecipeStore,
    RecipeUpdate, StoreError, UserRecord, DEFAULT_CATEGORIES,
};
use async_trait::async_trait;
use chrono::Utc;
use recipe_catalog_shared::Category;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserRecord>,
    categories: Vec<Category>,
    recipes: HashMap<Uuid, RecipeRecord>,
}

/// In-memory implementation of [`CredentialStore`] and [`RecipeStore`]
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    /// Create a store seeded with the default categories
    pub fn new() -> Self {
        let categories = DEFAULT_CATEGORIES
            .iter()
            .zip(1..)
            .map(|(name, id)| Category {
                id,
                name: name.to_string(),
            })
            .collect();

        Self {
            tables: Arc::new(RwLock::new(Tables {
                categories,
                ..Default::default()
            })),
        }
    }

    /// Number of stored users
    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }
}

impl Tables {
    fn username_taken(&self, username: &str, except: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != except)
    }

    fn check_category(&self, category_id: Option<i32>) -> Result<(), StoreError> {
        match category_id {
            Some(id) if !self.categories.iter().any(|c| c.id == id) => {
                Err(StoreError::UnknownCategory(id))
            }
            _ => Ok(()),
        }
    }
}

fn apply_blob(target: &mut Option<Vec<u8>>, update: BlobUpdate) {
    if let BlobUpdate::Replace(bytes) = update {
        *target = Some(bytes);
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.username_taken(&user.username, None) {
            return Err(StoreError::DuplicateUsername);
        }

        let record = UserRecord {
            id: Uuid::new_v4(),
            username: user.username,
            password_hash: user.password_hash,
            name: user.name,
            avatar: user.avatar,
        };
        tables.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, update: ProfileUpdate) -> Result<UserRecord, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        if tables.username_taken(&update.username, Some(id)) {
            return Err(StoreError::DuplicateUsername);
        }

        let user = tables.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.name = update.name;
        user.username = update.username;
        apply_blob(&mut user.avatar, update.avatar);
        Ok(user.clone())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.tables.read().await.categories.clone())
    }

    async fn list_recipes(&self) -> Result<Vec<RecipeRecord>, StoreError> {
        let tables = self.tables.read().await;
        let mut recipes: Vec<_> = tables.recipes.values().cloned().collect();
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recipes)
    }

    async fn find_recipe(&self, id: Uuid) -> Result<Option<RecipeRecord>, StoreError> {
        Ok(self.tables.read().await.recipes.get(&id).cloned())
    }

    async fn create_recipe(&self, recipe: NewRecipe) -> Result<RecipeRecord, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check_category(recipe.category_id)?;

        let record = RecipeRecord {
            id: Uuid::new_v4(),
            name: recipe.name,
            image: recipe.image,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
            category_id: recipe.category_id,
            user_id: recipe.user_id,
            created_at: Utc::now(),
        };
        tables.recipes.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_recipe(
        &self,
        id: Uuid,
        update: RecipeUpdate,
    ) -> Result<RecipeRecord, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check_category(update.category_id)?;

        let recipe = tables.recipes.get_mut(&id).ok_or(StoreError::NotFound)?;
        recipe.name = update.name;
        recipe.ingredients = update.ingredients;
        recipe.instructions = update.instructions;
        recipe.category_id = update.category_id;
        apply_blob(&mut recipe.image, update.image);
        Ok(recipe.clone())
    }

    async fn delete_recipe(&self, id: Uuid) -> Result<(), StoreError> {
        self.tables
            .write()
            .await
            .recipes
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
