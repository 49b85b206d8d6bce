use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::db::enums::Language;
use crate::db::schema::recipes;
use crate::model::media::Media;
use crate::model::user::AuthorSummary;

#[derive(Debug, Clone, PartialEq, Eq, Identifiable, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub id: i32,
    pub author_id: i32,
    pub title_en: String,
    pub title_es: Option<String>,
    pub ingredients_en: Vec<String>,
    pub ingredients_es: Option<Vec<String>>,
    pub instructions_en: String,
    pub instructions_es: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Every author-editable column of a recipe. Used for inserts (with the author
/// id alongside) and full replacement on update, where `None` writes `NULL`.
#[derive(Debug, Clone, PartialEq, Eq, Insertable, AsChangeset)]
#[diesel(table_name = recipes)]
#[diesel(treat_none_as_null = true)]
pub struct RecipeContent {
    pub title_en: String,
    pub title_es: Option<String>,
    pub ingredients_en: Vec<String>,
    pub ingredients_es: Option<Vec<String>>,
    pub instructions_en: String,
    pub instructions_es: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub is_public: bool,
}

impl From<&Recipe> for RecipeContent {
    fn from(recipe: &Recipe) -> Self {
        Self {
            title_en: recipe.title_en.clone(),
            title_es: recipe.title_es.clone(),
            ingredients_en: recipe.ingredients_en.clone(),
            ingredients_es: recipe.ingredients_es.clone(),
            instructions_en: recipe.instructions_en.clone(),
            instructions_es: recipe.instructions_es.clone(),
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            servings: recipe.servings,
            tags: recipe.tags.clone(),
            categories: recipe.categories.clone(),
            is_public: recipe.is_public,
        }
    }
}

/// A recipe together with everything its response shape needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRecord {
    pub recipe: Recipe,
    pub author: AuthorSummary,
    pub media: Vec<Media>,
    pub comments_count: i64,
    pub favorites_count: i64,
}

/// Filters for the public recipe listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Case-insensitive substring matched against the title and instructions
    /// columns of `language`.
    pub search: Option<String>,
    pub language: Language,
    pub category: Option<String>,
    pub tag: Option<String>,
}

impl RecipeFilter {
    /// ## Summary
    /// Applies the filter to an in-memory recipe with the same semantics as the SQL query.
    #[must_use]
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if !recipe.is_public {
            return false;
        }
        if let Some(category) = &self.category
            && !recipe.categories.iter().any(|c| c == category)
        {
            return false;
        }
        if let Some(tag) = &self.tag
            && !recipe.tags.iter().any(|t| t == tag)
        {
            return false;
        }
        let Some(search) = &self.search else {
            return true;
        };
        let needle = search.to_lowercase();
        let (title, instructions) = match self.language {
            Language::En => (
                Some(recipe.title_en.as_str()),
                Some(recipe.instructions_en.as_str()),
            ),
            Language::Es => (recipe.title_es.as_deref(), recipe.instructions_es.as_deref()),
        };
        [title, instructions]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}
