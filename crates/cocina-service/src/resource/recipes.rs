//! Recipe listing, lookup and authoring.

use serde::{Deserialize, Serialize};

use cocina_core::constants::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use cocina_db::db::enums::Language;
use cocina_db::model::recipe::{Recipe, RecipeContent, RecipeFilter};
use cocina_db::model::user::User;
use cocina_db::store::Store;

use super::{load_recipe, load_recipe_record};
use crate::auth::policy::{Action, Resource, authorize};
use crate::error::{ServiceError, ServiceResult};
use crate::localize::{RecipeView, project_recipe, response_language};
use crate::media::MediaHost;
use crate::validate::{Validator, double_option};

/// Raw query string values; parsed and bounded by [`list`].
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RecipeListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    pub language: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    #[must_use]
    pub fn new(page: u32, limit: u32, total: i64) -> Self {
        let limit_i64 = i64::from(limit.max(1));
        Self {
            page,
            limit,
            total,
            pages: (total + limit_i64 - 1) / limit_i64,
        }
    }

    fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

#[derive(Debug, Serialize)]
pub struct RecipePage {
    pub recipes: Vec<RecipeView>,
    pub pagination: Pagination,
}

/// A create or update body. On update every field is optional and absent
/// fields keep their stored value; an explicit `null` clears a nullable field.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePayload {
    pub title_en: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub title_es: Option<Option<String>>,
    pub ingredients_en: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub ingredients_es: Option<Option<Vec<String>>>,
    pub instructions_en: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub instructions_es: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub prep_time: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub cook_time: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub servings: Option<Option<i64>>,
    pub tags: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

fn optional_text(value: Option<&str>) -> Option<String> {
    value.map(trimmed).filter(|v| !v.is_empty())
}

fn clean_list(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|item| trimmed(item))
        .filter(|item| !item.is_empty())
        .collect()
}

fn dedup_tags(tags: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    clean_list(tags)
        .into_iter()
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

fn bounded(
    validator: &mut Validator,
    param: &str,
    value: Option<i64>,
    min: i64,
    msg: &str,
) -> Option<i32> {
    let value = value?;
    match i32::try_from(value) {
        Ok(v) if value >= min => Some(v),
        _ => {
            validator.body(param, msg);
            None
        }
    }
}

impl RecipePayload {
    /// ## Summary
    /// Merges the payload over `base` (or over empty content when creating)
    /// and checks every per-field rule on the result.
    ///
    /// ## Errors
    /// Returns `Validation` listing each offending field.
    pub fn into_content(self, base: Option<&Recipe>) -> ServiceResult<RecipeContent> {
        let mut content = base.map_or_else(
            || RecipeContent {
                title_en: String::new(),
                title_es: None,
                ingredients_en: Vec::new(),
                ingredients_es: None,
                instructions_en: String::new(),
                instructions_es: None,
                prep_time: None,
                cook_time: None,
                servings: None,
                tags: Vec::new(),
                categories: Vec::new(),
                is_public: true,
            },
            RecipeContent::from,
        );
        let mut validator = Validator::new();

        if let Some(title) = self.title_en {
            content.title_en = trimmed(&title);
        }
        if content.title_en.is_empty() {
            validator.body("titleEn", "Title (English) is required");
        }
        if let Some(ingredients) = self.ingredients_en {
            content.ingredients_en = clean_list(&ingredients);
        }
        if content.ingredients_en.is_empty() {
            validator.body("ingredientsEn", "At least one ingredient is required");
        }
        if let Some(instructions) = self.instructions_en {
            content.instructions_en = trimmed(&instructions);
        }
        if content.instructions_en.is_empty() {
            validator.body("instructionsEn", "Instructions (English) are required");
        }

        if let Some(title) = self.title_es {
            content.title_es = optional_text(title.as_deref());
        }
        if let Some(ingredients) = self.ingredients_es {
            content.ingredients_es = ingredients
                .as_deref()
                .map(clean_list)
                .filter(|list| !list.is_empty());
        }
        if let Some(instructions) = self.instructions_es {
            content.instructions_es = optional_text(instructions.as_deref());
        }

        if let Some(prep_time) = self.prep_time {
            content.prep_time = bounded(
                &mut validator,
                "prepTime",
                prep_time,
                0,
                "Prep time must be a non-negative integer",
            );
        }
        if let Some(cook_time) = self.cook_time {
            content.cook_time = bounded(
                &mut validator,
                "cookTime",
                cook_time,
                0,
                "Cook time must be a non-negative integer",
            );
        }
        if let Some(servings) = self.servings {
            content.servings = bounded(
                &mut validator,
                "servings",
                servings,
                1,
                "Servings must be a positive integer",
            );
        }

        if let Some(tags) = self.tags {
            content.tags = dedup_tags(&tags);
        }
        if let Some(categories) = self.categories {
            content.categories = clean_list(&categories);
        }
        if let Some(is_public) = self.is_public {
            content.is_public = is_public;
        }

        validator.finish()?;
        Ok(content)
    }
}

fn parse_bounded(
    validator: &mut Validator,
    param: &str,
    raw: Option<&str>,
    default: u32,
    range: std::ops::RangeInclusive<u32>,
    msg: &str,
) -> u32 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<u32>() {
        Ok(value) if range.contains(&value) => value,
        _ => {
            validator.query(param, msg);
            default
        }
    }
}

/// ## Summary
/// Lists public recipes, newest first, with optional search, category and tag
/// filters. Private recipes never appear here, whoever is asking.
///
/// ## Errors
/// Returns `query` validation errors for a bad page, limit or language.
#[tracing::instrument(skip(store, viewer))]
pub async fn list(
    store: &dyn Store,
    viewer: Option<&User>,
    query: RecipeListQuery,
) -> ServiceResult<RecipePage> {
    let mut validator = Validator::new();
    let page = parse_bounded(
        &mut validator,
        "page",
        query.page.as_deref(),
        1,
        1..=u32::MAX,
        "Page must be a positive integer",
    );
    let limit = parse_bounded(
        &mut validator,
        "limit",
        query.limit.as_deref(),
        DEFAULT_PAGE_LIMIT,
        1..=MAX_PAGE_LIMIT,
        "Limit must be between 1 and 50",
    );
    let language_override = match query.language.as_deref() {
        None => None,
        Some(code) => {
            let parsed = Language::parse(code);
            if parsed.is_none() {
                validator.query("language", "Language must be either en or es");
            }
            parsed
        }
    };
    validator.finish()?;

    let language = response_language(language_override, viewer);
    let filter = RecipeFilter {
        search: optional_text(query.search.as_deref()),
        language,
        category: optional_text(query.category.as_deref()),
        tag: optional_text(query.tag.as_deref()),
    };

    let pagination = Pagination::new(page, limit, 0);
    let (records, total) = store
        .list_public_recipes(&filter, pagination.offset(), i64::from(limit))
        .await?;

    Ok(RecipePage {
        recipes: records
            .iter()
            .map(|record| project_recipe(record, language))
            .collect(),
        pagination: Pagination::new(page, limit, total),
    })
}

/// ## Summary
/// Every recipe the caller authored, public and private, newest first.
///
/// ## Errors
/// Returns a database error if the lookup fails.
pub async fn mine(store: &dyn Store, actor: &User) -> ServiceResult<Vec<RecipeView>> {
    let records = store.list_recipes_by_author(actor.id).await?;
    Ok(records
        .iter()
        .map(|record| project_recipe(record, actor.language_pref))
        .collect())
}

/// ## Summary
/// One recipe, projected to the caller's language.
///
/// ## Errors
/// - 404 "Recipe not found"
/// - 403 "Access denied" for a private recipe the caller may not read
#[tracing::instrument(skip(store, viewer))]
pub async fn get(
    store: &dyn Store,
    viewer: Option<&User>,
    recipe_id: i32,
) -> ServiceResult<RecipeView> {
    let record = load_recipe_record(store, recipe_id).await?;
    authorize(viewer, &Resource::recipe(&record.recipe), Action::Read)?;
    Ok(project_recipe(&record, response_language(None, viewer)))
}

/// ## Summary
/// Creates a recipe owned by the caller.
///
/// ## Errors
/// Returns validation errors for missing English fields or out-of-range numbers.
#[tracing::instrument(skip_all, fields(author_id = actor.id))]
pub async fn create(
    store: &dyn Store,
    actor: &User,
    payload: RecipePayload,
) -> ServiceResult<RecipeView> {
    let content = payload.into_content(None)?;
    let recipe = store.create_recipe(actor.id, content).await?;
    tracing::info!(recipe_id = recipe.id, "Recipe created");

    let record = load_recipe_record(store, recipe.id).await?;
    Ok(project_recipe(&record, actor.language_pref))
}

/// ## Summary
/// Applies a partial update. Owners, editors and admins may edit.
///
/// ## Errors
/// - 404 "Recipe not found"
/// - 403 "Access denied"
/// - 400 validation errors on the merged result
#[tracing::instrument(skip(store, actor, payload), fields(actor_id = actor.id))]
pub async fn update(
    store: &dyn Store,
    actor: &User,
    recipe_id: i32,
    payload: RecipePayload,
) -> ServiceResult<RecipeView> {
    let recipe = load_recipe(store, recipe_id).await?;
    authorize(Some(actor), &Resource::recipe(&recipe), Action::Edit)?;

    let content = payload.into_content(Some(&recipe))?;
    store
        .update_recipe(recipe_id, content)
        .await?
        .ok_or(ServiceError::NotFound("Recipe not found"))?;
    tracing::info!("Recipe updated");

    let record = load_recipe_record(store, recipe_id).await?;
    Ok(project_recipe(&record, actor.language_pref))
}

/// ## Summary
/// Deletes a recipe with its comments, favorites and media rows, then asks the
/// media host to release each stored object.
///
/// ## Side Effects
/// Host release failures are logged and otherwise ignored.
///
/// ## Errors
/// - 404 "Recipe not found"
/// - 403 "Access denied" unless the caller is the owner or an admin
#[tracing::instrument(skip(store, host, actor), fields(actor_id = actor.id))]
pub async fn delete(
    store: &dyn Store,
    host: &dyn MediaHost,
    actor: &User,
    recipe_id: i32,
) -> ServiceResult<()> {
    let recipe = load_recipe(store, recipe_id).await?;
    authorize(Some(actor), &Resource::recipe(&recipe), Action::Delete)?;

    let media = store
        .delete_recipe(recipe_id)
        .await?
        .ok_or(ServiceError::NotFound("Recipe not found"))?;
    tracing::info!(media = media.len(), "Recipe deleted");

    for item in media {
        let Some(public_id) = item.public_id.as_deref() else {
            continue;
        };
        if let Err(err) = host.destroy(public_id, item.media_type).await {
            tracing::warn!(media_id = item.id, error = %err, "Failed to release media object");
        }
    }

    Ok(())
}
