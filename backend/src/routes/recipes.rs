//! Recipe and category routes

use super::form::FormData;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::{RecipeInput, RecipeService};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use recipe_catalog_shared::{Category, Recipe};
use uuid::Uuid;

/// Create catalog routes
pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/recipes/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
}

/// GET /api/categories
async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(RecipeService::categories(state.recipes.as_ref()).await?))
}

/// GET /api/recipes
async fn list_recipes(State(state): State<AppState>) -> ApiResult<Json<Vec<Recipe>>> {
    Ok(Json(RecipeService::list(state.recipes.as_ref()).await?))
}

/// GET /api/recipes/:id
async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Recipe>> {
    Ok(Json(RecipeService::get(state.recipes.as_ref(), id).await?))
}

/// POST /api/recipes
async fn create_recipe(
    State(state): State<AppState>,
    auth_user: AuthUser,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Recipe>)> {
    let input = read_recipe_form(multipart).await?;
    let recipe = RecipeService::create(state.recipes.as_ref(), auth_user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// PUT /api/recipes/:id
async fn update_recipe(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> ApiResult<Json<Recipe>> {
    let input = read_recipe_form(multipart).await?;
    let recipe =
        RecipeService::update(state.recipes.as_ref(), auth_user.user_id, id, input).await?;
    Ok(Json(recipe))
}

/// DELETE /api/recipes/:id
async fn delete_recipe(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    RecipeService::delete(state.recipes.as_ref(), auth_user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn read_recipe_form(multipart: Multipart) -> ApiResult<RecipeInput> {
    let mut form = FormData::read(multipart).await?;
    Ok(RecipeInput {
        name: form.text("name"),
        ingredients: form.list("ingredients")?,
        instructions: form.list("instructions")?,
        category_id: form.optional_i32("category_id")?,
        image: form.take_file("image"),
    })
}
