//! Stateless session tokens (HS256 JWT).
//!
//! Claims carry the user id, email and role plus issued-at and expiry. There is
//! no revocation list; deactivating a user takes effect through the identity
//! lookup on every request.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use cocina_db::db::enums::Role;
use cocina_db::model::user::User;

use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub id: i32,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Signing material and lifetime for session tokens. Built once at start-up.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionKeys {
    #[must_use]
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::days(ttl_days),
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }
}

/// ## Summary
/// Issues a signed token for `user`, valid from `now` for the configured lifetime.
///
/// ## Errors
/// Returns an error if encoding fails.
pub fn issue_session_token(
    keys: &SessionKeys,
    user: &User,
    now: DateTime<Utc>,
) -> ServiceResult<String> {
    let claims = SessionClaims {
        id: user.id,
        email: user.email.clone(),
        role: user.role,
        iat: now.timestamp(),
        exp: (now + keys.ttl).timestamp(),
    };

    Ok(jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &keys.encoding,
    )?)
}

/// ## Summary
/// Verifies signature and expiry and returns the claims.
///
/// ## Errors
/// Returns `ServiceError::InvalidToken` for any malformed, tampered or expired token.
pub fn parse_session_token(keys: &SessionKeys, token: &str) -> ServiceResult<SessionClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    jsonwebtoken::decode::<SessionClaims>(token, &keys.decoding, &validation)
        .map(|data| data.claims)
        .map_err(|err| {
            tracing::debug!(error = %err, "Rejected session token");
            ServiceError::InvalidToken
        })
}
