//! `/api/comments`. The `{id}` segment names the recipe for GET and POST and
//! the comment for PUT and DELETE.

use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, Router, handler};
use serde::Serialize;

use cocina_core::constants::COMMENTS_ROUTE_COMPONENT;
use cocina_service::auth::depot::{optional_user, require_user};
use cocina_service::localize::CommentView;
use cocina_service::resource::comments::{self, CommentRequest};

use super::{MessageResponse, json_body, path_id};
use crate::error::{AppResult, respond};
use crate::store_handler::get_store_from_depot;

#[derive(Debug, Serialize)]
pub struct CommentListResponse {
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub message: &'static str,
    pub comment: CommentView,
}

async fn list(req: &Request, depot: &Depot) -> AppResult<CommentListResponse> {
    let recipe_id = path_id(req, "recipeId")?;
    let store = get_store_from_depot(depot)?;
    let comments = comments::list(store.as_ref(), optional_user(depot), recipe_id).await?;
    Ok(CommentListResponse { comments })
}

#[handler]
async fn list_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = list(req, depot).await;
    respond(res, depot, StatusCode::OK, result);
}

async fn add(req: &mut Request, depot: &Depot) -> AppResult<CommentResponse> {
    let actor = require_user(depot)?;
    let recipe_id = path_id(req, "recipeId")?;
    let body: CommentRequest = json_body(req).await?;
    let store = get_store_from_depot(depot)?;
    let comment = comments::add(store.as_ref(), actor, recipe_id, body).await?;
    Ok(CommentResponse {
        message: "Comment added successfully",
        comment,
    })
}

#[handler]
async fn add_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = add(req, depot).await;
    respond(res, depot, StatusCode::CREATED, result);
}

async fn update(req: &mut Request, depot: &Depot) -> AppResult<CommentResponse> {
    let actor = require_user(depot)?;
    let comment_id = path_id(req, "id")?;
    let body: CommentRequest = json_body(req).await?;
    let store = get_store_from_depot(depot)?;
    let comment = comments::update(store.as_ref(), actor, comment_id, body).await?;
    Ok(CommentResponse {
        message: "Comment updated successfully",
        comment,
    })
}

#[handler]
async fn update_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = update(req, depot).await;
    respond(res, depot, StatusCode::OK, result);
}

async fn delete(req: &Request, depot: &Depot) -> AppResult<MessageResponse> {
    let actor = require_user(depot)?;
    let comment_id = path_id(req, "id")?;
    let store = get_store_from_depot(depot)?;
    comments::delete(store.as_ref(), actor, comment_id).await?;
    Ok(MessageResponse {
        message: "Comment deleted successfully",
    })
}

#[handler]
async fn delete_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = delete(req, depot).await;
    respond(res, depot, StatusCode::OK, result);
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(COMMENTS_ROUTE_COMPONENT).push(
        Router::with_path("{id}")
            .get(list_handler)
            .post(add_handler)
            .put(update_handler)
            .delete(delete_handler),
    )
}
