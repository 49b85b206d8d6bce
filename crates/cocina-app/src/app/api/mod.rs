mod auth;
mod comments;
mod favorites;
mod health;
mod recipes;
mod share;
mod upload;

use std::sync::Arc;

use salvo::Request;
use salvo::Router;
use serde::Serialize;
use serde::de::DeserializeOwned;

use cocina_core::config::Settings;
use cocina_service::auth::token::SessionKeys;
use cocina_service::validate::parse_path_id;

use crate::error::{AppError, AppResult};
use crate::middleware::{auth::AuthMiddleware, rate_limit::rate_limiter};

pub use cocina_core::constants::{API_ROUTE_COMPONENT, API_ROUTE_PREFIX};

/// Body of every response that only carries a confirmation.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// ## Summary
/// Deserializes the JSON body.
///
/// ## Errors
/// Returns a 400 "Invalid request body" when the body is missing, not JSON or
/// of the wrong shape.
pub(crate) async fn json_body<T: DeserializeOwned>(req: &mut Request) -> AppResult<T> {
    req.parse_json::<T>().await.map_err(|e| {
        tracing::debug!(error = %e, "Rejected request body");
        AppError::InvalidBody("Invalid request body")
    })
}

/// ## Summary
/// Reads the `{id}` path segment, reporting failures under `param`.
///
/// ## Errors
/// Returns a `params` validation error unless the segment is a positive integer.
pub(crate) fn path_id(req: &Request, param: &str) -> AppResult<i32> {
    parse_path_id(param, req.param::<String>("id").as_deref()).map_err(AppError::from)
}

/// ## Summary
/// Constructs the `/api` router.
///
/// The health check sits outside the rate limiter and the auth middleware;
/// every other route passes through both.
#[must_use]
pub fn routes(settings: &Settings) -> Router {
    let keys = Arc::new(SessionKeys::new(
        &settings.auth.jwt_secret,
        settings.auth.session_ttl_days,
    ));

    let mut guarded = Router::new();
    if settings.rate_limit.enabled {
        guarded = guarded.hoop(rate_limiter(&settings.rate_limit));
    } else {
        tracing::warn!("Rate limiting disabled");
    }

    Router::with_path(API_ROUTE_COMPONENT)
        .push(health::routes())
        .push(
            guarded
                .hoop(AuthMiddleware { keys })
                .push(auth::routes())
                .push(recipes::routes())
                .push(comments::routes())
                .push(favorites::routes())
                .push(upload::routes())
                .push(share::routes()),
        )
}
