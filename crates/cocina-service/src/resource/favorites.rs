//! The caller's own favorites. Every operation is scoped to the caller's id.

use cocina_db::model::user::User;
use cocina_db::store::Store;

use super::load_recipe;
use crate::auth::policy::{Action, Principal, Resource, authorize, can_access};
use crate::error::{ServiceError, ServiceResult};
use crate::localize::{FavoriteView, RecipeView, project_favorite, project_recipe};

/// ## Summary
/// Favorited recipes, most recently favorited first. Recipes that have since
/// become unreadable to the caller are left out.
///
/// ## Errors
/// Returns a database error if the lookup fails.
pub async fn list(store: &dyn Store, actor: &User) -> ServiceResult<Vec<RecipeView>> {
    let principal = Principal::from(actor);
    let records = store.list_favorite_recipes(actor.id).await?;
    Ok(records
        .iter()
        .filter(|record| {
            can_access(
                Some(principal),
                &Resource::recipe(&record.recipe),
                Action::Read,
            )
        })
        .map(|record| project_recipe(record, actor.language_pref))
        .collect())
}

/// ## Errors
/// - 404 "Recipe not found"
/// - 403 "Access denied" when the recipe is not readable by the caller
/// - 400 "Recipe already in favorites"
#[tracing::instrument(skip(store, actor), fields(user_id = actor.id))]
pub async fn add(store: &dyn Store, actor: &User, recipe_id: i32) -> ServiceResult<FavoriteView> {
    let recipe = load_recipe(store, recipe_id).await?;
    authorize(Some(actor), &Resource::recipe(&recipe), Action::Read)?;

    match store.create_favorite(actor.id, recipe_id).await {
        Ok(favorite) => {
            tracing::info!(favorite_id = favorite.id, "Recipe favorited");
            Ok(project_favorite(&favorite))
        }
        Err(err) if err.is_unique_violation() => {
            Err(ServiceError::Conflict("Recipe already in favorites"))
        }
        Err(err) => Err(err.into()),
    }
}

/// ## Errors
/// Returns 404 "Favorite not found" when the caller has not favorited the recipe.
#[tracing::instrument(skip(store, actor), fields(user_id = actor.id))]
pub async fn remove(store: &dyn Store, actor: &User, recipe_id: i32) -> ServiceResult<()> {
    if !store.delete_favorite(actor.id, recipe_id).await? {
        return Err(ServiceError::NotFound("Favorite not found"));
    }
    tracing::info!("Favorite removed");
    Ok(())
}
