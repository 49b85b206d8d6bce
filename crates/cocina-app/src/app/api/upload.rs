//! `/api/upload`. The `{id}` segment names the recipe for POST and the media
//! item for DELETE.

use salvo::http::header::CONTENT_LENGTH;
use salvo::http::{ParseError, StatusCode};
use salvo::{Depot, Request, Response, Router, handler};
use serde::Serialize;

use cocina_core::constants::UPLOAD_ROUTE_COMPONENT;
use cocina_service::auth::depot::require_user;
use cocina_service::localize::MediaView;
use cocina_service::error::ServiceError;
use cocina_service::media::MediaUpload;
use cocina_service::resource::uploads::{self, FILE_TOO_LARGE_MESSAGE};

use super::{MessageResponse, path_id};
use crate::config::get_config_from_depot;
use crate::error::{AppError, AppResult, respond};
use crate::media_handler::get_media_host_from_depot;
use crate::store_handler::get_store_from_depot;

/// Allowance on top of the file limit for multipart framing and text fields.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Debug, Serialize)]
pub struct MediaResponse {
    pub message: &'static str,
    pub media: MediaView,
}

fn file_too_large() -> AppError {
    ServiceError::BadRequest(FILE_TOO_LARGE_MESSAGE.to_string()).into()
}

/// ## Summary
/// Collects at most `limit` bytes of body, then pulls the `file` part and the
/// `altText` field out of it. A body that is not multipart reads as carrying
/// neither.
///
/// ## Errors
/// - 400 "File too large" when the body is declared or turns out to be over `limit`
/// - 500 if the spooled upload cannot be read back
async fn read_form(
    req: &mut Request,
    limit: usize,
) -> AppResult<(Option<MediaUpload>, Option<String>)> {
    let declared = req
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());
    if declared.is_some_and(|length| length > limit) {
        tracing::debug!(?declared, limit, "Upload body declared over limit");
        return Err(file_too_large());
    }

    let body = match req.payload_with_max_size(limit).await {
        Ok(bytes) => bytes.clone(),
        Err(ParseError::Other(e)) => {
            tracing::debug!(error = %e, limit, "Upload body over limit");
            return Err(file_too_large());
        }
        Err(e) => {
            tracing::debug!(error = %e, "Upload body unreadable");
            return Ok((None, None));
        }
    };
    *req.body_mut() = body.into();

    let form = match req.form_data().await {
        Ok(form) => form,
        Err(e) => {
            tracing::debug!(error = %e, "Upload request carried no readable form");
            return Ok((None, None));
        }
    };

    let alt_text = form.fields.get("altText").cloned();
    let Some(part) = form.files.get("file") else {
        return Ok((None, alt_text));
    };
    let file_name = part.name().unwrap_or_default().to_string();
    let content_type = part.content_type().map(|mime| mime.to_string());
    let path = part.path().clone();

    let bytes = tokio::fs::read(&path).await?;
    Ok((
        Some(MediaUpload {
            file_name,
            content_type,
            bytes,
        }),
        alt_text,
    ))
}

async fn upload(req: &mut Request, depot: &Depot) -> AppResult<MediaResponse> {
    let actor = require_user(depot)?;
    let recipe_id = path_id(req, "recipeId")?;
    let settings = get_config_from_depot(depot)?;
    let store = get_store_from_depot(depot)?;
    let host = get_media_host_from_depot(depot)?;

    let target = uploads::authorize_upload(store.as_ref(), actor, recipe_id).await?;

    let body_limit = usize::try_from(settings.media.max_upload_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let (file, alt_text) = read_form(req, body_limit).await?;

    let media = uploads::upload(
        store.as_ref(),
        host.as_ref(),
        &settings.media,
        target,
        file,
        alt_text,
    )
    .await?;
    Ok(MediaResponse {
        message: "File uploaded successfully",
        media,
    })
}

/// ## Summary
/// POST /api/upload/{recipeId} - Attach an image or video to a recipe
///
/// The recipe and the caller's edit rights are checked before the body is
/// read.
///
/// ## Side Effects
/// Stores the file with the media host and appends a media row.
#[handler]
async fn upload_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = upload(req, depot).await;
    respond(res, depot, StatusCode::CREATED, result);
}

async fn delete(req: &Request, depot: &Depot) -> AppResult<MessageResponse> {
    let actor = require_user(depot)?;
    let media_id = path_id(req, "mediaId")?;
    let store = get_store_from_depot(depot)?;
    let host = get_media_host_from_depot(depot)?;
    uploads::delete(store.as_ref(), host.as_ref(), actor, media_id).await?;
    Ok(MessageResponse {
        message: "Media deleted successfully",
    })
}

#[handler]
async fn delete_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = delete(req, depot).await;
    respond(res, depot, StatusCode::OK, result);
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(UPLOAD_ROUTE_COMPONENT).push(
        Router::with_path("{id}")
            .post(upload_handler)
            .delete(delete_handler),
    )
}
