use salvo::async_trait;
use std::sync::Arc;

use crate::error::AppResult;
use cocina_core::error::CoreError;
use cocina_service::media::MediaHost;

pub struct MediaHostHandler {
    pub host: Arc<dyn MediaHost>,
}

#[async_trait]
impl salvo::Handler for MediaHostHandler {
    #[tracing::instrument(skip_all)]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.host));
    }
}

/// ## Summary
/// Retrieves the media host from the depot.
///
/// ## Errors
/// Returns an error if no media host was injected.
pub fn get_media_host_from_depot(depot: &salvo::Depot) -> AppResult<Arc<dyn MediaHost>> {
    depot
        .obtain::<Arc<dyn MediaHost>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Media host not found in depot").into())
}
