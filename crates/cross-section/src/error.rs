//! Error types for cross-section computation.

use thiserror::Error;

/// Errors that can occur while sampling a cross-section.
#[derive(Error, Debug)]
pub enum CrossSectionError {
    /// The sampling path could not be built.
    #[error("invalid cross-section path: {0}")]
    Path(#[from] projection::ProjectionError),

    /// The field has no layers or no grid points.
    #[error("field '{0}' has no data to sample")]
    EmptyField(String),

    /// No contour levels fit between zero and the section maximum.
    #[error("cross-section has no positive values to contour (max = {0})")]
    NoLevels(f32),
}

/// Result type for cross-section operations.
pub type CrossSectionResult<T> = Result<T, CrossSectionError>;
