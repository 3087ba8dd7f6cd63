//! Error types for projection and path operations.

use thiserror::Error;

pub type ProjectionResult<T> = Result<T, ProjectionError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("A path needs at least 2 steps, got {0}")]
    TooFewSteps(usize),

    #[error("Endpoints are antipodal, the great circle between them is undefined")]
    AntipodalEndpoints,

    #[error("Invalid map extent: {0}")]
    InvalidExtent(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(#[from] case_common::CommonError),
}
