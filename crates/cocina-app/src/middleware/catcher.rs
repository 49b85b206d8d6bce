use salvo::http::{ResBody, StatusCode};
use salvo::writing::Json;
use salvo::{FlowCtrl, Request, Response, handler};

use cocina_core::constants::API_ROUTE_PREFIX;

use crate::error::ErrorResponse;

pub const NOT_FOUND_MESSAGE: &str = "API endpoint not found";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests from this IP, please try again later.";

/// ## Summary
/// Gives body-less error responses under `/api` the JSON `{error}` shape:
/// unmatched routes become "API endpoint not found" and rate-limit rejections
/// carry a descriptive message.
#[handler]
pub async fn json_errors(req: &mut Request, res: &mut Response, ctrl: &mut FlowCtrl) {
    let bodiless = matches!(res.body, ResBody::None | ResBody::Error(_));
    if !bodiless || !req.uri().path().starts_with(API_ROUTE_PREFIX) {
        return;
    }

    let (status, message) = match res.status_code.unwrap_or(StatusCode::NOT_FOUND) {
        StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED => {
            (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
        }
        StatusCode::TOO_MANY_REQUESTS => (StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_MESSAGE),
        _ => return,
    };

    tracing::debug!(path = %req.uri().path(), message, "Caught error response");
    res.status_code(status);
    res.render(Json(ErrorResponse {
        error: message.to_string(),
    }));
    ctrl.skip_rest();
}
