//! Resource orchestrators.
//!
//! Each function composes identity, the access policy and the store for one
//! endpoint. Validation and authorization run before any write.

pub mod accounts;
pub mod comments;
pub mod favorites;
pub mod recipes;
pub mod share;
pub mod uploads;

use cocina_db::model::recipe::{Recipe, RecipeRecord};
use cocina_db::store::Store;

use crate::error::{ServiceError, ServiceResult};

/// ## Summary
/// Loads a recipe or fails with 404 "Recipe not found".
///
/// ## Errors
/// Returns `NotFound` if the recipe is absent, or a database error.
pub async fn load_recipe(store: &dyn Store, recipe_id: i32) -> ServiceResult<Recipe> {
    store
        .find_recipe(recipe_id)
        .await?
        .ok_or(ServiceError::NotFound("Recipe not found"))
}

/// ## Summary
/// Loads a recipe with its author, media and counts, or fails with 404.
///
/// ## Errors
/// Returns `NotFound` if the recipe is absent, or a database error.
pub async fn load_recipe_record(store: &dyn Store, recipe_id: i32) -> ServiceResult<RecipeRecord> {
    store
        .find_recipe_record(recipe_id)
        .await?
        .ok_or(ServiceError::NotFound("Recipe not found"))
}

#[cfg(test)]
pub(crate) mod fixtures;
