//! Protocol error types.

use thiserror::Error;

/// Protocol-level errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The payload is not valid JSON or does not have the rule tree shape.
    #[error("malformed rule payload: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is not a scalar (arrays and objects cannot be bound).
    #[error("value is not a scalar: {0}")]
    NotScalar(String),
}
