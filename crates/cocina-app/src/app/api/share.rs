use salvo::http::StatusCode;
use salvo::{Depot, Request, Response, Router, handler};
use serde::Serialize;

use cocina_core::constants::SHARE_ROUTE_COMPONENT;
use cocina_service::auth::depot::{optional_user, require_user};
use cocina_service::localize::RecipeView;
use cocina_service::resource::share::{
    self, EMAIL_PENDING_MESSAGE, PDF_PENDING_MESSAGE, ShareEmailRequest, SharedRecipe,
};

use super::{json_body, path_id};
use crate::error::{AppResult, respond};
use crate::store_handler::get_store_from_depot;

#[derive(Debug, Serialize)]
pub struct PdfResponse {
    pub message: &'static str,
    pub recipe: RecipeView,
}

#[derive(Debug, Serialize)]
pub struct EmailResponse {
    pub message: &'static str,
    pub shared: SharedRecipe,
}

async fn pdf(req: &Request, depot: &Depot) -> AppResult<PdfResponse> {
    let recipe_id = path_id(req, "recipeId")?;
    let store = get_store_from_depot(depot)?;
    let recipe = share::pdf(store.as_ref(), optional_user(depot), recipe_id).await?;
    Ok(PdfResponse {
        message: PDF_PENDING_MESSAGE,
        recipe,
    })
}

#[handler]
async fn pdf_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = pdf(req, depot).await;
    respond(res, depot, StatusCode::OK, result);
}

async fn email(req: &mut Request, depot: &Depot) -> AppResult<EmailResponse> {
    let actor = require_user(depot)?;
    let recipe_id = path_id(req, "recipeId")?;
    let body: ShareEmailRequest = json_body(req).await?;
    let store = get_store_from_depot(depot)?;
    let shared = share::email(store.as_ref(), actor, recipe_id, body).await?;
    Ok(EmailResponse {
        message: EMAIL_PENDING_MESSAGE,
        shared,
    })
}

#[handler]
async fn email_handler(req: &mut Request, depot: &mut Depot, res: &mut Response) {
    let result = email(req, depot).await;
    respond(res, depot, StatusCode::OK, result);
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(SHARE_ROUTE_COMPONENT)
        .push(Router::with_path("pdf/{id}").get(pdf_handler))
        .push(Router::with_path("email/{id}").post(email_handler))
}
