use salvo::http::StatusCode;
use salvo::writing::Json;
use salvo::{Depot, Response};
use serde::Serialize;
use thiserror::Error;

use cocina_core::constants::GENERIC_ERROR_MESSAGE;
use cocina_service::error::ServiceError;
use cocina_service::validate::FieldError;

use crate::config::get_config_from_depot;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] ServiceError),

    #[error(transparent)]
    DatabaseError(#[from] cocina_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] cocina_core::error::CoreError),

    /// The request body could not be read as the expected shape.
    #[error("{0}")]
    InvalidBody(&'static str),

    #[error("Failed to read uploaded file: {0}")]
    UploadRead(#[from] std::io::Error),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

/// ## Summary
/// Single-message error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// ## Summary
/// Field validation error body
#[derive(Debug, Serialize)]
pub struct ValidationResponse<'a> {
    pub errors: &'a [FieldError],
}

impl AppError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::ServiceError(err) => err.status_code(),
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::DatabaseError(_) | Self::CoreError(_) | Self::UploadRead(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    const fn field_errors(&self) -> Option<&Vec<FieldError>> {
        match self {
            Self::ServiceError(ServiceError::Validation(errors)) => Some(errors),
            _ => None,
        }
    }
}

/// ## Summary
/// Writes `err` as a JSON error response.
///
/// Server errors are logged with their cause. Their message reaches the
/// client only in development; otherwise the body carries a generic message.
pub fn render_error(res: &mut Response, depot: &Depot, err: &AppError) {
    let status = err.status_code();
    res.status_code(status);

    if let Some(errors) = err.field_errors() {
        tracing::debug!(count = errors.len(), "Validation failed");
        res.render(Json(ValidationResponse { errors }));
        return;
    }

    let message = if status.is_server_error() {
        tracing::error!(error = ?err, "Request failed");
        let expose = get_config_from_depot(depot).is_ok_and(|settings| !settings.is_production());
        if expose {
            err.to_string()
        } else {
            GENERIC_ERROR_MESSAGE.to_string()
        }
    } else {
        tracing::debug!(%status, error = %err, "Request rejected");
        err.to_string()
    };

    res.render(Json(ErrorResponse { error: message }));
}

/// ## Summary
/// Renders `result` with `status` on success, or as an error response.
pub fn respond<T: Serialize + Send>(
    res: &mut Response,
    depot: &Depot,
    status: StatusCode,
    result: AppResult<T>,
) {
    match result {
        Ok(body) => {
            res.status_code(status);
            res.render(Json(body));
        }
        Err(err) => render_error(res, depot, &err),
    }
}
