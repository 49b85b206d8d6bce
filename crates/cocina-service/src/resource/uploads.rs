//! Recipe media: bytes go to the media host, the row keeps the URL and public id.

use cocina_core::config::MediaConfig;
use cocina_db::model::media::NewMedia;
use cocina_db::model::user::User;
use cocina_db::store::Store;

use super::load_recipe;
use crate::auth::policy::{Action, Resource, authorize};
use crate::error::{ServiceError, ServiceResult};
use crate::localize::{MediaView, project_media};
use crate::media::{MediaHost, MediaUpload};

pub const FILE_TOO_LARGE_MESSAGE: &str = "File too large";

/// A recipe the caller has been cleared to attach media to. Only
/// [`authorize_upload`] hands these out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTarget {
    recipe_id: i32,
}

impl UploadTarget {
    #[must_use]
    pub const fn recipe_id(self) -> i32 {
        self.recipe_id
    }
}

/// ## Summary
/// Resolves the recipe and checks edit rights, before any upload body is read.
///
/// ## Errors
/// - 404 "Recipe not found"
/// - 403 "Access denied" without edit rights on the recipe
#[tracing::instrument(skip(store, actor), fields(actor_id = actor.id))]
pub async fn authorize_upload(
    store: &dyn Store,
    actor: &User,
    recipe_id: i32,
) -> ServiceResult<UploadTarget> {
    let recipe = load_recipe(store, recipe_id).await?;
    authorize(Some(actor), &Resource::recipe(&recipe), Action::Edit)?;
    Ok(UploadTarget { recipe_id })
}

/// ## Summary
/// Stores `file` with the media host and records it against the recipe,
/// after every existing item.
///
/// ## Errors
/// - 400 "No file uploaded", "Invalid file type" or "File too large"
/// - 500 when the media host fails
#[tracing::instrument(skip_all, fields(recipe_id = target.recipe_id))]
pub async fn upload(
    store: &dyn Store,
    host: &dyn MediaHost,
    media: &MediaConfig,
    target: UploadTarget,
    file: Option<MediaUpload>,
    alt_text: Option<String>,
) -> ServiceResult<MediaView> {
    let file = file.ok_or_else(|| ServiceError::BadRequest("No file uploaded".to_string()))?;
    if !file.has_allowed_type() {
        return Err(ServiceError::BadRequest("Invalid file type".to_string()));
    }
    if !u64::try_from(file.bytes.len()).is_ok_and(|size| size <= media.max_upload_bytes) {
        return Err(ServiceError::BadRequest(FILE_TOO_LARGE_MESSAGE.to_string()));
    }

    let stored = host
        .upload(file, &media.folder)
        .await
        .inspect_err(|err| tracing::error!(error = %err, "Media host upload failed"))?;

    let row = store
        .create_media(NewMedia {
            recipe_id: target.recipe_id,
            url: stored.url,
            media_type: stored.media_type,
            public_id: Some(stored.public_id),
            alt_text: alt_text
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
        })
        .await?;
    tracing::info!(media_id = row.id, position = row.position, "Media uploaded");

    Ok(project_media(&row))
}

/// ## Summary
/// Releases the stored object, then deletes the row. Rows without a public id
/// skip the release.
///
/// ## Errors
/// - 404 "Media not found"
/// - 403 "Access denied" unless the caller owns the recipe or is an admin
/// - 500 when the media host fails; the row is kept in that case
#[tracing::instrument(skip(store, host, actor), fields(actor_id = actor.id))]
pub async fn delete(
    store: &dyn Store,
    host: &dyn MediaHost,
    actor: &User,
    media_id: i32,
) -> ServiceResult<()> {
    let item = store
        .find_media(media_id)
        .await?
        .ok_or(ServiceError::NotFound("Media not found"))?;
    let recipe = load_recipe(store, item.recipe_id).await?;
    authorize(Some(actor), &Resource::recipe(&recipe), Action::Delete)?;

    match item.public_id.as_deref() {
        Some(public_id) => host
            .destroy(public_id, item.media_type)
            .await
            .inspect_err(|err| tracing::error!(error = %err, "Media host release failed"))?,
        None => tracing::warn!("Media has no public id; skipping host release"),
    }

    if !store.delete_media(media_id).await? {
        return Err(ServiceError::NotFound("Media not found"));
    }
    tracing::info!("Media deleted");
    Ok(())
}
