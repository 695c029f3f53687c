//! Recipe catalog service
//!
//! Reads are public. Writes need an authenticated user; a recipe owned by
//! someone else cannot be changed, while unowned (seeded) recipes can be
//! edited by any signed-in user.

use crate::error::ApiError;
use crate::media;
use crate::repositories::{BlobUpdate, NewRecipe, RecipeRecord, RecipeStore, RecipeUpdate};
use recipe_catalog_shared::validation::validate_recipe;
use recipe_catalog_shared::{Category, Recipe};
use tracing::info;
use uuid::Uuid;

const RECIPE_NOT_FOUND: &str = "Recipe not found.";

/// Fields submitted by the recipe form
#[derive(Debug, Clone, Default)]
pub struct RecipeInput {
    pub name: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub category_id: Option<i32>,
    pub image: Option<Vec<u8>>,
}

impl RecipeInput {
    /// Trim the name and drop blank list entries, then validate
    fn normalized(self) -> Result<Self, ApiError> {
        let clean = |items: Vec<String>| -> Vec<String> {
            items
                .into_iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        };

        let input = Self {
            name: self.name.trim().to_string(),
            ingredients: clean(self.ingredients),
            instructions: clean(self.instructions),
            ..self
        };
        validate_recipe(&input.name, &input.ingredients, &input.instructions)?;
        Ok(input)
    }
}

/// Recipe service
pub struct RecipeService;

impl RecipeService {
    pub async fn categories(store: &dyn RecipeStore) -> Result<Vec<Category>, ApiError> {
        Ok(store.list_categories().await?)
    }

    pub async fn list(store: &dyn RecipeStore) -> Result<Vec<Recipe>, ApiError> {
        let recipes = store.list_recipes().await?;
        Ok(recipes.into_iter().map(to_recipe).collect())
    }

    pub async fn get(store: &dyn RecipeStore, id: Uuid) -> Result<Recipe, ApiError> {
        Ok(to_recipe(Self::find(store, id).await?))
    }

    pub async fn create(
        store: &dyn RecipeStore,
        user_id: Uuid,
        input: RecipeInput,
    ) -> Result<Recipe, ApiError> {
        let input = input.normalized()?;

        let recipe = store
            .create_recipe(NewRecipe {
                name: input.name,
                image: input.image.filter(|bytes| !bytes.is_empty()),
                ingredients: input.ingredients,
                instructions: input.instructions,
                category_id: input.category_id,
                user_id: Some(user_id),
            })
            .await?;

        metrics::counter!("recipes_written_total", "op" => "create").increment(1);
        info!(recipe_id = %recipe.id, user_id = %user_id, "Recipe created");
        Ok(to_recipe(recipe))
    }

    pub async fn update(
        store: &dyn RecipeStore,
        user_id: Uuid,
        id: Uuid,
        input: RecipeInput,
    ) -> Result<Recipe, ApiError> {
        let input = input.normalized()?;
        ensure_owner(&Self::find(store, id).await?, user_id)?;

        let recipe = store
            .update_recipe(
                id,
                RecipeUpdate {
                    name: input.name,
                    image: BlobUpdate::from_upload(input.image),
                    ingredients: input.ingredients,
                    instructions: input.instructions,
                    category_id: input.category_id,
                },
            )
            .await?;

        metrics::counter!("recipes_written_total", "op" => "update").increment(1);
        info!(recipe_id = %id, user_id = %user_id, "Recipe updated");
        Ok(to_recipe(recipe))
    }

    pub async fn delete(store: &dyn RecipeStore, user_id: Uuid, id: Uuid) -> Result<(), ApiError> {
        ensure_owner(&Self::find(store, id).await?, user_id)?;
        store.delete_recipe(id).await?;

        metrics::counter!("recipes_written_total", "op" => "delete").increment(1);
        info!(recipe_id = %id, user_id = %user_id, "Recipe deleted");
        Ok(())
    }

    async fn find(store: &dyn RecipeStore, id: Uuid) -> Result<RecipeRecord, ApiError> {
        store
            .find_recipe(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(RECIPE_NOT_FOUND.to_string()))
    }
}

fn ensure_owner(recipe: &RecipeRecord, user_id: Uuid) -> Result<(), ApiError> {
    match recipe.user_id {
        Some(owner) if owner != user_id => Err(ApiError::Forbidden(
            "Recipe belongs to another user.".to_string(),
        )),
        _ => Ok(()),
    }
}

fn to_recipe(record: RecipeRecord) -> Recipe {
    Recipe {
        image: media::optional_data_uri(record.image.as_deref()),
        id: record.id,
        name: record.name,
        ingredients: record.ingredients,
        instructions: record.instructions,
        category_id: record.category_id,
        user_id: record.user_id,
        created_at: record.created_at,
    }
}
