//! Field-level validation errors, rendered as `{"errors":[{msg,param,location}]}`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Body,
    Query,
    Params,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub msg: String,
    pub param: String,
    pub location: Location,
}

/// Collects field errors for one request.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, location: Location, param: &str, msg: impl Into<String>) {
        self.errors.push(FieldError {
            msg: msg.into(),
            param: param.to_string(),
            location,
        });
    }

    pub fn body(&mut self, param: &str, msg: impl Into<String>) {
        self.push(Location::Body, param, msg);
    }

    pub fn query(&mut self, param: &str, msg: impl Into<String>) {
        self.push(Location::Query, param, msg);
    }

    /// ## Errors
    /// Returns `ServiceError::Validation` if any field error was recorded.
    pub fn finish(self) -> ServiceResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(self.errors))
        }
    }
}

/// ## Summary
/// Builds the error for a path id that is not a positive integer.
#[must_use]
pub fn invalid_path_id(param: &str) -> ServiceError {
    ServiceError::Validation(vec![FieldError {
        msg: format!("{param} must be a positive integer"),
        param: param.to_string(),
        location: Location::Params,
    }])
}

/// ## Summary
/// Parses a path segment as a positive database id.
///
/// ## Errors
/// Returns a `params` validation error when the segment is not a positive integer.
pub fn parse_path_id(param: &str, raw: Option<&str>) -> ServiceResult<i32> {
    raw.and_then(|value| value.parse::<i32>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| invalid_path_id(param))
}

/// Distinguishes an absent JSON field (`None`) from an explicit `null` (`Some(None)`).
///
/// ## Errors
/// Propagates deserialization errors of the inner value.
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
