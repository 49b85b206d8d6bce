use salvo::http::StatusCode;
use thiserror::Error;

use crate::media::MediaHostError;
use crate::validate::FieldError;

/// Service layer errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    DatabaseError(#[from] cocina_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] cocina_core::error::CoreError),

    #[error(transparent)]
    MediaHost(#[from] MediaHostError),

    /// No usable identity where one is required.
    #[error("{0}")]
    NotAuthenticated(&'static str),

    /// A bearer token was presented but its signature or expiry is invalid.
    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    /// Duplicate email or favorite. Reported as 400, not 409.
    #[error("{0}")]
    Conflict(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Token error: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),
}

impl ServiceError {
    /// ## Summary
    /// Maps the error onto its HTTP status.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotAuthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidToken | Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::BadRequest(_) | Self::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::DatabaseError(_)
            | Self::CoreError(_)
            | Self::MediaHost(_)
            | Self::InvalidConfiguration(_)
            | Self::TokenError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// ## Summary
    /// Whether the message may be shown to clients in every environment.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
