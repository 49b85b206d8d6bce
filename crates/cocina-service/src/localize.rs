//! Single-language response shapes.
//!
//! ## Summary
//! Recipes store English and Spanish columns side by side. A projection picks
//! the requested language per field and falls back to English for any field
//! whose Spanish value is missing or blank. English is always complete.
//! Projections never carry password hashes or invite tokens.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cocina_db::db::enums::{Language, MediaType, Role};
use cocina_db::model::comment::CommentRecord;
use cocina_db::model::favorite::Favorite;
use cocina_db::model::media::Media;
use cocina_db::model::recipe::RecipeRecord;
use cocina_db::model::user::{AuthorSummary, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub language_pref: Language,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorView {
    pub id: i32,
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaView {
    pub id: i32,
    pub recipe_id: i32,
    pub url: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub public_id: Option<String>,
    pub alt_text: Option<String>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView {
    pub id: i32,
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorView,
    pub media: Vec<MediaView>,
    pub comments_count: i64,
    pub favorites_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: i32,
    pub content: String,
    pub recipe_id: i32,
    pub author_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author: AuthorView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteView {
    pub id: i32,
    pub user_id: i32,
    pub recipe_id: i32,
    pub created_at: DateTime<Utc>,
}

fn pick_text(requested: Option<&str>, english: &str) -> String {
    requested
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(english)
        .to_string()
}

fn pick_list(requested: Option<&Vec<String>>, english: &[String]) -> Vec<String> {
    requested
        .filter(|list| list.iter().any(|item| !item.trim().is_empty()))
        .map_or_else(|| english.to_vec(), Clone::clone)
}

/// ## Summary
/// Projects a stored recipe into `language`, field by field.
#[must_use]
pub fn project_recipe(record: &RecipeRecord, language: Language) -> RecipeView {
    let recipe = &record.recipe;
    let (title, ingredients, instructions) = match language {
        Language::En => (
            recipe.title_en.clone(),
            recipe.ingredients_en.clone(),
            recipe.instructions_en.clone(),
        ),
        Language::Es => (
            pick_text(recipe.title_es.as_deref(), &recipe.title_en),
            pick_list(recipe.ingredients_es.as_ref(), &recipe.ingredients_en),
            pick_text(recipe.instructions_es.as_deref(), &recipe.instructions_en),
        ),
    };

    RecipeView {
        id: recipe.id,
        title,
        ingredients,
        instructions,
        prep_time: recipe.prep_time,
        cook_time: recipe.cook_time,
        servings: recipe.servings,
        tags: recipe.tags.clone(),
        categories: recipe.categories.clone(),
        is_public: recipe.is_public,
        created_at: recipe.created_at,
        updated_at: recipe.updated_at,
        author: project_author(&record.author),
        media: record.media.iter().map(project_media).collect(),
        comments_count: record.comments_count,
        favorites_count: record.favorites_count,
    }
}

#[must_use]
pub fn project_user(user: &User) -> UserView {
    UserView {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
        language_pref: user.language_pref,
        created_at: user.created_at,
    }
}

#[must_use]
pub fn project_author(author: &AuthorSummary) -> AuthorView {
    AuthorView {
        id: author.id,
        email: author.email.clone(),
        name: author.name.clone(),
    }
}

#[must_use]
pub fn project_media(media: &Media) -> MediaView {
    MediaView {
        id: media.id,
        recipe_id: media.recipe_id,
        url: media.url.clone(),
        media_type: media.media_type,
        public_id: media.public_id.clone(),
        alt_text: media.alt_text.clone(),
        order: media.position,
        created_at: media.created_at,
    }
}

#[must_use]
pub fn project_comment(record: &CommentRecord) -> CommentView {
    CommentView {
        id: record.comment.id,
        content: record.comment.content.clone(),
        recipe_id: record.comment.recipe_id,
        author_id: record.comment.author_id,
        created_at: record.comment.created_at,
        updated_at: record.comment.updated_at,
        author: project_author(&record.author),
    }
}

#[must_use]
pub const fn project_favorite(favorite: &Favorite) -> FavoriteView {
    FavoriteView {
        id: favorite.id,
        user_id: favorite.user_id,
        recipe_id: favorite.recipe_id,
        created_at: favorite.created_at,
    }
}

/// ## Summary
/// Language for a response: explicit override, then the caller's preference, then English.
#[must_use]
pub fn response_language(override_language: Option<Language>, user: Option<&User>) -> Language {
    override_language
        .or_else(|| user.map(|u| u.language_pref))
        .unwrap_or_default()
}
