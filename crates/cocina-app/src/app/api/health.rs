use chrono::{DateTime, Utc};
use salvo::writing::Json;
use salvo::{Router, handler};
use serde::Serialize;

use cocina_core::constants::HEALTH_ROUTE_COMPONENT;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[handler]
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now(),
    })
}

#[must_use]
pub fn routes() -> Router {
    Router::with_path(HEALTH_ROUTE_COMPONENT).get(health)
}
