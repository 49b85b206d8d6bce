//! Sharing endpoints. Both stop after the read-access check and report that
//! delivery is not implemented.

use serde::{Deserialize, Serialize};

use cocina_core::constants::MAX_SHARE_MESSAGE_LENGTH;
use cocina_core::util::email::{is_valid_email, normalize_email};
use cocina_db::model::user::User;
use cocina_db::store::Store;

use super::load_recipe_record;
use crate::auth::policy::{Action, Resource, authorize};
use crate::error::ServiceResult;
use crate::localize::{RecipeView, project_recipe, response_language};
use crate::validate::Validator;

pub const PDF_PENDING_MESSAGE: &str = "PDF generation not yet implemented";
pub const EMAIL_PENDING_MESSAGE: &str = "Email sharing not yet implemented";

#[derive(Debug, Default, Deserialize)]
pub struct ShareEmailRequest {
    pub email: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedRecipe {
    pub recipe_id: i32,
    pub email: String,
    pub recipe_title: String,
}

async fn readable_recipe(
    store: &dyn Store,
    viewer: Option<&User>,
    recipe_id: i32,
) -> ServiceResult<RecipeView> {
    let record = load_recipe_record(store, recipe_id).await?;
    authorize(viewer, &Resource::recipe(&record.recipe), Action::Read)?;
    Ok(project_recipe(&record, response_language(None, viewer)))
}

/// ## Errors
/// Same as reading the recipe: 404 when missing, 403 when not readable.
#[tracing::instrument(skip(store, viewer))]
pub async fn pdf(
    store: &dyn Store,
    viewer: Option<&User>,
    recipe_id: i32,
) -> ServiceResult<RecipeView> {
    readable_recipe(store, viewer, recipe_id).await
}

/// ## Errors
/// - 400 validation errors for a malformed email or an over-long message
/// - 404 / 403 as for reading the recipe
#[tracing::instrument(skip(store, actor, request), fields(actor_id = actor.id))]
pub async fn email(
    store: &dyn Store,
    actor: &User,
    recipe_id: i32,
    request: ShareEmailRequest,
) -> ServiceResult<SharedRecipe> {
    let mut validator = Validator::new();
    let email = request.email.as_deref().map(normalize_email).unwrap_or_default();
    if !is_valid_email(&email) {
        validator.body("email", "Invalid email format");
    }
    if request
        .message
        .as_deref()
        .is_some_and(|message| message.chars().count() > MAX_SHARE_MESSAGE_LENGTH)
    {
        validator.body("message", "Message too long");
    }
    validator.finish()?;

    let recipe = readable_recipe(store, Some(actor), recipe_id).await?;
    tracing::debug!("Email share requested; delivery not implemented");

    Ok(SharedRecipe {
        recipe_id,
        email,
        recipe_title: recipe.title,
    })
}
