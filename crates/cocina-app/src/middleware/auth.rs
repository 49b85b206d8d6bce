use std::sync::Arc;

use salvo::Depot;
use salvo::http::header::AUTHORIZATION;
use tracing::error;

use crate::error::{AppError, render_error};
use crate::store_handler::get_store_from_depot;
use cocina_core::error::CoreError;
use cocina_service::auth::authenticate::{AnonymousReason, Identity, resolve_identity};
use cocina_service::auth::depot::depot_keys;
use cocina_service::auth::token::SessionKeys;

/// ## Summary
/// Resolves the bearer token of every request into an [`Identity`] and stores
/// it in the depot. Never rejects by itself: handlers decide whether an
/// anonymous identity is acceptable.
///
/// ## Side Effects
/// Injects the [`SessionKeys`] and inserts the identity under
/// `depot_keys::IDENTITY` for downstream handlers.
///
/// ## Errors
/// Responds 500 and stops the chain only when the store lookup fails.
pub struct AuthMiddleware {
    pub keys: Arc<SessionKeys>,
}

#[salvo::async_trait]
impl salvo::Handler for AuthMiddleware {
    #[tracing::instrument(skip_all, fields(
        method = %req.method(),
        path = %req.uri().path()
    ))]
    async fn handle(
        &self,
        req: &mut salvo::Request,
        depot: &mut Depot,
        res: &mut salvo::Response,
        ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.keys));

        if req.method() == salvo::http::Method::OPTIONS {
            depot.insert(
                depot_keys::IDENTITY,
                Identity::Anonymous(AnonymousReason::MissingToken),
            );
            return;
        }

        let store = match get_store_from_depot(depot) {
            Ok(store) => store,
            Err(e) => {
                error!(error = ?e, "Failed to get store from depot");
                render_error(res, depot, &e);
                ctrl.skip_rest();
                return;
            }
        };

        let authorization = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        match resolve_identity(store.as_ref(), &self.keys, authorization).await {
            Ok(identity) => {
                if let Identity::User(user) = &identity {
                    tracing::debug!(user_id = user.id, "Request authenticated");
                }
                depot.insert(depot_keys::IDENTITY, identity);
            }
            Err(e) => {
                error!(error = ?e, "Identity resolution failed");
                render_error(res, depot, &AppError::from(e));
                ctrl.skip_rest();
            }
        }
    }
}

/// ## Summary
/// Retrieves the session keys injected by [`AuthMiddleware`].
///
/// ## Errors
/// Returns an error if the middleware did not run for this request.
pub fn get_session_keys_from_depot(depot: &Depot) -> Result<Arc<SessionKeys>, AppError> {
    depot
        .obtain::<Arc<SessionKeys>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Session keys not found in depot").into())
}
