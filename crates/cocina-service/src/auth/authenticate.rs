//! Identity resolution from the `Authorization` header.
//!
//! ## Summary
//! Resolution never fails the request by itself: every outcome is recorded as
//! an [`Identity`]. Endpoints that require a user call [`Identity::require`],
//! which turns the anonymous reason into the matching 401/403 error. Optional
//! endpoints call [`Identity::user`] and treat every failure as anonymous.

use cocina_db::model::user::User;
use cocina_db::store::Store;

use super::token::{SessionKeys, parse_session_token};
use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnonymousReason {
    MissingToken,
    InvalidToken,
    UnknownOrInactiveUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    User(Box<User>),
    Anonymous(AnonymousReason),
}

impl Identity {
    /// ## Summary
    /// Mandatory resolution.
    ///
    /// ## Errors
    /// - `NotAuthenticated("Access token required")` when no bearer token was sent
    /// - `InvalidToken` when the token failed verification
    /// - `NotAuthenticated("Invalid or inactive user")` when the user is missing or inactive
    pub fn require(&self) -> ServiceResult<&User> {
        match self {
            Self::User(user) => Ok(user.as_ref()),
            Self::Anonymous(AnonymousReason::MissingToken) => {
                Err(ServiceError::NotAuthenticated("Access token required"))
            }
            Self::Anonymous(AnonymousReason::InvalidToken) => Err(ServiceError::InvalidToken),
            Self::Anonymous(AnonymousReason::UnknownOrInactiveUser) => {
                Err(ServiceError::NotAuthenticated("Invalid or inactive user"))
            }
        }
    }

    /// Optional resolution: any failure reads as anonymous.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::User(user) => Some(user.as_ref()),
            Self::Anonymous(_) => None,
        }
    }
}

/// ## Summary
/// Extracts the token from a `Bearer <token>` header value. The scheme is
/// matched case-insensitively; any other scheme counts as no token.
#[must_use]
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// ## Summary
/// Resolves the request's `Authorization` header value to an identity.
///
/// ## Errors
/// Returns an error only when the store lookup itself fails.
#[tracing::instrument(skip_all)]
pub async fn resolve_identity(
    store: &dyn Store,
    keys: &SessionKeys,
    authorization: Option<&str>,
) -> ServiceResult<Identity> {
    let Some(token) = bearer_token(authorization) else {
        return Ok(Identity::Anonymous(AnonymousReason::MissingToken));
    };

    let Ok(claims) = parse_session_token(keys, token) else {
        return Ok(Identity::Anonymous(AnonymousReason::InvalidToken));
    };

    match store.find_user_by_id(claims.id).await? {
        Some(user) if user.is_active => {
            tracing::trace!(user_id = user.id, "Resolved identity");
            Ok(Identity::User(Box::new(user)))
        }
        _ => {
            tracing::debug!(user_id = claims.id, "Token names an unknown or inactive user");
            Ok(Identity::Anonymous(AnonymousReason::UnknownOrInactiveUser))
        }
    }
}
