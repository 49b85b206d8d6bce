//! Comments on recipes.
//!
//! Reading follows the parent recipe's visibility; changing or removing a
//! comment is reserved to its author and admins.

use serde::Deserialize;

use cocina_core::constants::MAX_COMMENT_LENGTH;
use cocina_db::model::comment::{Comment, NewComment};
use cocina_db::model::user::User;
use cocina_db::store::Store;

use super::load_recipe;
use crate::auth::policy::{Action, Resource, authorize};
use crate::error::{ServiceError, ServiceResult};
use crate::localize::{CommentView, project_comment};
use crate::validate::Validator;

#[derive(Debug, Default, Deserialize)]
pub struct CommentRequest {
    pub content: Option<String>,
}

/// ## Summary
/// Trims the content and checks it is 1 to 1000 characters.
///
/// ## Errors
/// Returns a `body` validation error on `content`.
pub fn clean_content(request: &CommentRequest) -> ServiceResult<String> {
    let content = request.content.as_deref().map(str::trim).unwrap_or_default();
    let length = content.chars().count();
    let mut validator = Validator::new();
    if length == 0 {
        validator.body("content", "Comment content is required");
    } else if length > MAX_COMMENT_LENGTH {
        validator.body("content", "Comment must be at most 1000 characters");
    }
    validator.finish()?;
    Ok(content.to_string())
}

async fn load_comment(store: &dyn Store, comment_id: i32) -> ServiceResult<Comment> {
    store
        .find_comment(comment_id)
        .await?
        .ok_or(ServiceError::NotFound("Comment not found"))
}

async fn authorize_comment(
    store: &dyn Store,
    actor: &User,
    comment: &Comment,
    action: Action,
) -> ServiceResult<()> {
    let parent = load_recipe(store, comment.recipe_id).await?;
    authorize(Some(actor), &Resource::comment(comment, &parent), action)
}

/// ## Summary
/// Comments on a recipe, oldest first.
///
/// ## Errors
/// - 404 "Recipe not found"
/// - 403 "Access denied" when the recipe is not readable by the caller
#[tracing::instrument(skip(store, viewer))]
pub async fn list(
    store: &dyn Store,
    viewer: Option<&User>,
    recipe_id: i32,
) -> ServiceResult<Vec<CommentView>> {
    let recipe = load_recipe(store, recipe_id).await?;
    authorize(viewer, &Resource::recipe(&recipe), Action::Read)?;

    let records = store.list_comments(recipe_id).await?;
    Ok(records.iter().map(project_comment).collect())
}

/// ## Errors
/// - 400 validation error on `content`
/// - 404 "Recipe not found"
/// - 403 "Access denied" when the recipe is not readable by the caller
#[tracing::instrument(skip(store, actor, request), fields(author_id = actor.id))]
pub async fn add(
    store: &dyn Store,
    actor: &User,
    recipe_id: i32,
    request: CommentRequest,
) -> ServiceResult<CommentView> {
    let content = clean_content(&request)?;
    let recipe = load_recipe(store, recipe_id).await?;
    authorize(Some(actor), &Resource::recipe(&recipe), Action::Read)?;

    let record = store
        .create_comment(NewComment {
            recipe_id,
            author_id: actor.id,
            content,
        })
        .await?;
    tracing::info!(comment_id = record.comment.id, "Comment added");
    Ok(project_comment(&record))
}

/// ## Errors
/// - 400 validation error on `content`
/// - 404 "Comment not found"
/// - 403 "Access denied" unless the caller wrote it or is an admin
#[tracing::instrument(skip(store, actor, request), fields(actor_id = actor.id))]
pub async fn update(
    store: &dyn Store,
    actor: &User,
    comment_id: i32,
    request: CommentRequest,
) -> ServiceResult<CommentView> {
    let content = clean_content(&request)?;
    let comment = load_comment(store, comment_id).await?;
    authorize_comment(store, actor, &comment, Action::Edit).await?;

    let record = store
        .update_comment(comment_id, &content)
        .await?
        .ok_or(ServiceError::NotFound("Comment not found"))?;
    tracing::info!("Comment updated");
    Ok(project_comment(&record))
}

/// ## Errors
/// - 404 "Comment not found"
/// - 403 "Access denied" unless the caller wrote it or is an admin
#[tracing::instrument(skip(store, actor), fields(actor_id = actor.id))]
pub async fn delete(store: &dyn Store, actor: &User, comment_id: i32) -> ServiceResult<()> {
    let comment = load_comment(store, comment_id).await?;
    authorize_comment(store, actor, &comment, Action::Delete).await?;

    if !store.delete_comment(comment_id).await? {
        return Err(ServiceError::NotFound("Comment not found"));
    }
    tracing::info!("Comment deleted");
    Ok(())
}
