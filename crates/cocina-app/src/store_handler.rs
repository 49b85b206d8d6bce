use salvo::async_trait;
use std::sync::Arc;

use crate::error::AppResult;
use cocina_core::error::CoreError;
use cocina_db::store::Store;

/// Makes the shared [`Store`] available to every handler below it.
pub struct StoreHandler {
    pub store: Arc<dyn Store>,
}

#[async_trait]
impl salvo::Handler for StoreHandler {
    #[tracing::instrument(skip_all)]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.store));
    }
}

/// ## Summary
/// Retrieves the store from the depot.
///
/// ## Errors
/// Returns an error if the store is not found in the depot.
pub fn get_store_from_depot(depot: &salvo::Depot) -> AppResult<Arc<dyn Store>> {
    depot
        .obtain::<Arc<dyn Store>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Store not found in depot").into())
}
