//! PostgreSQL recipe store

use super::{
    map_constraint, NewRecipe, PgStore, RecipeRecord, RecipeStore, RecipeUpdate, StoreError,
};
use async_trait::async_trait;
use recipe_catalog_shared::Category;
use uuid::Uuid;

/// Categories created by the initial migration, in id order
pub const DEFAULT_CATEGORIES: [&str; 24] = [
    "Breakfast",
    "Soup",
    "Side Dish",
    "Rubs",
    "Seafood",
    "Sauces",
    "Sandwich and Wraps",
    "Salads",
    "Dessert",
    "Chicken",
    "Beef",
    "Appetizer",
    "Cakes",
    "Cookies",
    "Pastries",
    "Breads",
    "Pies",
    "Brownies and Bars",
    "Quick Breads",
    "Savory Bread",
    "Specialty Baking",
    "Breakfast Baking",
    "Traditional and Seasonal Baking",
    "International Baking",
];

const RECIPE_COLUMNS: &str =
    "id, name, image, ingredients, instructions, category_id, user_id, created_at";

#[async_trait]
impl RecipeStore for PgStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query_as::<_, (i32, String)>("SELECT id, name FROM category ORDER BY id")
            .fetch_all(self.pool())
            .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name)| Category { id, name })
            .collect())
    }

    async fn list_recipes(&self) -> Result<Vec<RecipeRecord>, StoreError> {
        let recipes = sqlx::query_as::<_, RecipeRecord>(&format!(
            "SELECT {} FROM recipe ORDER BY created_at DESC",
            RECIPE_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;

        Ok(recipes)
    }

    async fn find_recipe(&self, id: Uuid) -> Result<Option<RecipeRecord>, StoreError> {
        let recipe = sqlx::query_as::<_, RecipeRecord>(&format!(
            "SELECT {} FROM recipe WHERE id = $1",
            RECIPE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        Ok(recipe)
    }

    async fn create_recipe(&self, recipe: NewRecipe) -> Result<RecipeRecord, StoreError> {
        sqlx::query_as::<_, RecipeRecord>(&format!(
            r#"
            INSERT INTO recipe (name, image, ingredients, instructions, category_id, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            RECIPE_COLUMNS
        ))
        .bind(&recipe.name)
        .bind(&recipe.image)
        .bind(&recipe.ingredients)
        .bind(&recipe.instructions)
        .bind(recipe.category_id)
        .bind(recipe.user_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| map_constraint(e, recipe.category_id))
    }

    async fn update_recipe(
        &self,
        id: Uuid,
        update: RecipeUpdate,
    ) -> Result<RecipeRecord, StoreError> {
        let category_id = update.category_id;
        sqlx::query_as::<_, RecipeRecord>(&format!(
            r#"
            UPDATE recipe SET
                name = $2,
                image = COALESCE($3, image),
                ingredients = $4,
                instructions = $5,
                category_id = $6
            WHERE id = $1
            RETURNING {}
            "#,
            RECIPE_COLUMNS
        ))
        .bind(id)
        .bind(&update.name)
        .bind(update.image.into_replacement())
        .bind(&update.ingredients)
        .bind(&update.instructions)
        .bind(category_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| map_constraint(e, category_id))?
        .ok_or(StoreError::NotFound)
    }

    async fn delete_recipe(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM recipe WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
