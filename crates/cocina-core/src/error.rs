use thiserror::Error;

/// Errors raised below the database and HTTP layers.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Settings that loaded but cannot be run with.
    #[error("Configuration error: {0}")]
    ConfigError(&'static str),

    /// A state the surrounding code guarantees cannot happen, such as a
    /// missing depot entry.
    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
