//! `/api/recipes`

use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, Router, handler};
use serde::Serialize;

use cocina_core::constants::RECIPES_ROUTE_COMPONENT;
use cocina_service::auth::depot::{optional_user, require_user};
use cocina_service::localize::RecipeView;
use cocina_service::resource::recipes::{self, RecipeListQuery, RecipePage, RecipePayload};

use super::{MessageResponse, json_body, path_id};
use crate::error::{AppError, AppResult, respond};
use crate::media_handler::get_media_host_from_depot;
use crate::store_handler::get_store_from_depot;

#[derive(Debug, Serialize)]
pub struct RecipeListResponse {
    pub recipes: Vec<RecipeView>,
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub recipe: RecipeView,
}

async fn list(req: &mut Request, depot: &Depot) -> AppResult<RecipePage> {
    let query = req.parse_queries::<RecipeListQuery>().map_err(|e| {
        tracing::debug!(error = %e, "Rejected query string");
        AppError::InvalidBody("Invalid query string")
    })?;
    let store = get_store_from_depot(depot)?;
    recipes::list(store.as_ref(), optional_user(depot), query)
        .await
        .map_err(AppError::from)
}

/// ## Summary
/// GET /api/recipes - Public recipes with search, filters and pagination
#[handler]
async fn list_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = list(req, depot).await;
    respond(res, depot, StatusCode::OK, result);
}

async fn mine(depot: &Depot) -> AppResult<RecipeListResponse> {
    let actor = require_user(depot)?;
    let store = get_store_from_depot(depot)?;
    let recipes = recipes::mine(store.as_ref(), actor).await?;
    Ok(RecipeListResponse { recipes })
}

/// ## Summary
/// GET /api/recipes/my - Every recipe the caller authored
#[handler]
async fn mine_handler(depot: &mut Depot, res: &mut Response) {
    let result = mine(depot).await;
    respond(res, depot, StatusCode::OK, result);
}

async fn show(req: &Request, depot: &Depot) -> AppResult<RecipeResponse> {
    let id = path_id(req, "id")?;
    let store = get_store_from_depot(depot)?;
    let recipe = recipes::get(store.as_ref(), optional_user(depot), id).await?;
    Ok(RecipeResponse {
        message: None,
        recipe,
    })
}

#[handler]
async fn show_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = show(req, depot).await;
    respond(res, depot, StatusCode::OK, result);
}

async fn create(req: &mut Request, depot: &Depot) -> AppResult<RecipeResponse> {
    let actor = require_user(depot)?;
    let payload: RecipePayload = json_body(req).await?;
    let store = get_store_from_depot(depot)?;
    let recipe = recipes::create(store.as_ref(), actor, payload).await?;
    Ok(RecipeResponse {
        message: Some("Recipe created successfully"),
        recipe,
    })
}

/// ## Summary
/// POST /api/recipes - Create a recipe owned by the caller
#[handler]
async fn create_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = create(req, depot).await;
    respond(res, depot, StatusCode::CREATED, result);
}

async fn update(req: &mut Request, depot: &Depot) -> AppResult<RecipeResponse> {
    let actor = require_user(depot)?;
    let id = path_id(req, "id")?;
    let payload: RecipePayload = json_body(req).await?;
    let store = get_store_from_depot(depot)?;
    let recipe = recipes::update(store.as_ref(), actor, id, payload).await?;
    Ok(RecipeResponse {
        message: Some("Recipe updated successfully"),
        recipe,
    })
}

/// ## Summary
/// PUT /api/recipes/{id} - Partial update; owner, editors and admins
#[handler]
async fn update_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = update(req, depot).await;
    respond(res, depot, StatusCode::OK, result);
}

async fn delete(req: &Request, depot: &Depot) -> AppResult<MessageResponse> {
    let actor = require_user(depot)?;
    let id = path_id(req, "id")?;
    let store = get_store_from_depot(depot)?;
    let host = get_media_host_from_depot(depot)?;
    recipes::delete(store.as_ref(), host.as_ref(), actor, id).await?;
    Ok(MessageResponse {
        message: "Recipe deleted successfully",
    })
}

/// ## Summary
/// DELETE /api/recipes/{id} - Owner or admin only
///
/// ## Side Effects
/// Cascades to comments, favorites and media; releases hosted media objects.
#[handler]
async fn delete_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = delete(req, depot).await;
    respond(res, depot, StatusCode::OK, result);
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(RECIPES_ROUTE_COMPONENT)
        .get(list_handler)
        .post(create_handler)
        .push(Router::with_path("my").get(mine_handler))
        .push(
            Router::with_path("{id}")
                .get(show_handler)
                .put(update_handler)
                .delete(delete_handler),
        )
}
