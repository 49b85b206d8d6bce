//! Service assembly shared by `main` and the HTTP tests.

pub mod api;

use std::sync::Arc;

use salvo::catcher::Catcher;
use salvo::cors::{AllowHeaders, AllowMethods, AllowOrigin, Cors};
use salvo::http::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use salvo::http::Method;
use salvo::{Router, Service};

use cocina_core::config::{CorsConfig, Settings};
use cocina_db::store::Store;
use cocina_service::media::MediaHost;

use crate::config::ConfigHandler;
use crate::media_handler::MediaHostHandler;
use crate::middleware::catcher::json_errors;
use crate::middleware::security_headers::security_headers;
use crate::store_handler::StoreHandler;

fn cors(config: &CorsConfig) -> Cors {
    Cors::new()
        .allow_origin(AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        ))
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([AUTHORIZATION, CONTENT_TYPE]))
}

/// ## Summary
/// Builds the complete HTTP service: depot-injecting hoops, the `/api`
/// routers, security headers, CORS and the JSON error catcher.
#[must_use]
pub fn build_service(
    settings: Settings,
    store: Arc<dyn Store>,
    media_host: Arc<dyn MediaHost>,
) -> Service {
    let cors = cors(&settings.cors).into_handler();
    let settings = Arc::new(settings);

    let router = Router::new()
        .hoop(ConfigHandler {
            settings: Arc::clone(&settings),
        })
        .hoop(StoreHandler { store })
        .hoop(MediaHostHandler { host: media_host })
        .push(api::routes(&settings));

    Service::new(router)
        .hoop(security_headers)
        .hoop(cors)
        .catcher(Catcher::default().hoop(json_errors))
}
