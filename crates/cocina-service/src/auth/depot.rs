//! Depot helpers for reading the resolved identity in handlers.

use salvo::Depot;

use cocina_db::model::user::User;

use super::authenticate::{AnonymousReason, Identity};
use crate::error::ServiceResult;

pub mod depot_keys {
    pub const IDENTITY: &str = "__identity";
}

static MISSING: Identity = Identity::Anonymous(AnonymousReason::MissingToken);

/// ## Summary
/// Returns the identity stored by the auth middleware, or a missing-token
/// anonymous identity when the middleware did not run.
#[must_use]
pub fn get_identity_from_depot(depot: &Depot) -> &Identity {
    depot
        .get::<Identity>(depot_keys::IDENTITY)
        .unwrap_or(&MISSING)
}

/// ## Summary
/// Mandatory identity for the current request.
///
/// ## Errors
/// Returns 401/403 errors as described on [`Identity::require`].
pub fn require_user(depot: &Depot) -> ServiceResult<&User> {
    get_identity_from_depot(depot).require()
}

/// Optional identity for the current request.
#[must_use]
pub fn optional_user(depot: &Depot) -> Option<&User> {
    get_identity_from_depot(depot).user()
}
