//! Landing-page recipe filtering

use recipe_catalog_shared::Recipe;

/// Category and search selection
///
/// A non-blank search term matches recipe names case-insensitively across
/// every category. Clearing the search falls back to the selected category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub category_id: Option<i32>,
    pub search: String,
}

impl RecipeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` selects "All"
    pub fn select_category(&mut self, category_id: Option<i32>) {
        self.category_id = category_id;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        let term = self.search.trim();
        if !term.is_empty() {
            return recipe
                .name
                .to_lowercase()
                .contains(&term.to_lowercase());
        }
        match self.category_id {
            Some(id) => recipe.category_id == Some(id),
            None => true,
        }
    }

    pub fn apply<'a>(&self, recipes: &'a [Recipe]) -> Vec<&'a Recipe> {
        recipes.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Dashboard caption, e.g. "1 Recipe Uploaded"
pub fn recipe_count_label(count: usize) -> String {
    let noun = if count == 1 { "Recipe" } else { "Recipes" };
    format!("{} {} Uploaded", count, noun)
}
