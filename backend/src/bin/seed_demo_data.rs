//! Seed the database with a demo admin and two recipes
//!
//! Safe to run repeatedly: existing rows are left alone.
//!
//! Usage: `seed-demo-data` (reads the same configuration as the server)

use anyhow::Result;
use recipe_catalog_backend::{
    auth::PasswordService,
    config::AppConfig,
    db,
    repositories::{CredentialStore, NewRecipe, NewUser, PgStore, RecipeStore},
};
use tracing::info;

const DEMO_USERNAME: &str = "test1";
const DEMO_PASSWORD: &str = "12345";
const DEMO_NAME: &str = "Test User";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed_demo_data=info,recipe_catalog_backend=info".into()),
        )
        .init();

    let config = AppConfig::load()?;
    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;
    let store = PgStore::new(pool);

    if store.find_by_username(DEMO_USERNAME).await?.is_none() {
        let password_hash = PasswordService::from_config(&config.password)
            .hash_async(DEMO_PASSWORD.to_string())
            .await?;
        store
            .create(NewUser {
                username: DEMO_USERNAME.to_string(),
                password_hash,
                name: DEMO_NAME.to_string(),
                avatar: None,
            })
            .await?;
        info!(username = DEMO_USERNAME, "Created demo user");
    }

    let existing: Vec<String> = store
        .list_recipes()
        .await?
        .into_iter()
        .map(|r| r.name)
        .collect();

    for recipe in demo_recipes() {
        if existing.contains(&recipe.name) {
            continue;
        }
        let name = recipe.name.clone();
        store.create_recipe(recipe).await?;
        info!(recipe = %name, "Created demo recipe");
    }

    info!("Database is seeded");
    Ok(())
}

fn demo_recipes() -> Vec<NewRecipe> {
    let strings = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };

    vec![
        NewRecipe {
            name: "Pancakes".to_string(),
            image: None,
            ingredients: strings(&["Flour", "Milk", "Eggs"]),
            instructions: strings(&["Mix ingredients and cook."]),
            category_id: Some(1),
            user_id: None,
        },
        NewRecipe {
            name: "Salad".to_string(),
            image: None,
            ingredients: strings(&["Lettuce", "Tomatoes", "Cucumbers"]),
            instructions: strings(&["Chop and mix."]),
            category_id: Some(2),
            user_id: None,
        },
    ]
}
