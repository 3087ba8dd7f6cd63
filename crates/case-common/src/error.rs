//! Error types for the shared geographic types.

use thiserror::Error;

/// Result type alias using CommonError.
pub type CommonResult<T> = Result<T, CommonError>;

/// Errors raised while building grids and geographic primitives.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommonError {
    #[error("Axis '{0}' is empty")]
    EmptyAxis(String),

    #[error("Axis '{0}' is not strictly monotonic")]
    NonMonotonicAxis(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Grid shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
}
