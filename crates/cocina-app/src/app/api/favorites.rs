use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, Router, handler};
use serde::Serialize;

use cocina_core::constants::FAVORITES_ROUTE_COMPONENT;
use cocina_service::auth::depot::require_user;
use cocina_service::localize::{FavoriteView, RecipeView};
use cocina_service::resource::favorites;

use super::{MessageResponse, path_id};
use crate::error::{AppResult, respond};
use crate::store_handler::get_store_from_depot;

#[derive(Debug, Serialize)]
pub struct FavoriteListResponse {
    pub recipes: Vec<RecipeView>,
}

#[derive(Debug, Serialize)]
pub struct FavoriteResponse {
    pub message: &'static str,
    pub favorite: FavoriteView,
}

async fn list(depot: &Depot) -> AppResult<FavoriteListResponse> {
    let actor = require_user(depot)?;
    let store = get_store_from_depot(depot)?;
    let recipes = favorites::list(store.as_ref(), actor).await?;
    Ok(FavoriteListResponse { recipes })
}

/// ## Summary
/// GET /api/favorites - The caller's favorites, newest first
#[handler]
async fn list_handler(depot: &mut Depot, res: &mut Response) {
    let result = list(depot).await;
    respond(res, depot, StatusCode::OK, result);
}

async fn add(req: &Request, depot: &Depot) -> AppResult<FavoriteResponse> {
    let actor = require_user(depot)?;
    let recipe_id = path_id(req, "recipeId")?;
    let store = get_store_from_depot(depot)?;
    let favorite = favorites::add(store.as_ref(), actor, recipe_id).await?;
    Ok(FavoriteResponse {
        message: "Recipe added to favorites",
        favorite,
    })
}

#[handler]
async fn add_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = add(req, depot).await;
    respond(res, depot, StatusCode::CREATED, result);
}

async fn remove(req: &Request, depot: &Depot) -> AppResult<MessageResponse> {
    let actor = require_user(depot)?;
    let recipe_id = path_id(req, "recipeId")?;
    let store = get_store_from_depot(depot)?;
    favorites::remove(store.as_ref(), actor, recipe_id).await?;
    Ok(MessageResponse {
        message: "Recipe removed from favorites",
    })
}

#[handler]
async fn remove_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = remove(req, depot).await;
    respond(res, depot, StatusCode::OK, result);
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(FAVORITES_ROUTE_COMPONENT)
        .get(list_handler)
        .push(
            Router::with_path("{id}")
                .post(add_handler)
                .delete(remove_handler),
        )
}
