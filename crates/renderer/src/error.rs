//! Error types for colormaps and plot rendering.

use thiserror::Error;

/// Errors building a colormap.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColormapError {
    #[error("Invalid hex colour '{0}'")]
    InvalidHex(String),

    #[error("Expected {expected} colours for these levels, got {actual}")]
    ColorCountMismatch { expected: usize, actual: usize },

    #[error("Invalid levels: {0}")]
    InvalidLevels(String),

    #[error("A colormap needs at least one colour")]
    Empty,
}

/// Errors producing a plot image.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Colormap error: {0}")]
    Colormap(#[from] ColormapError),

    #[error("Projection error: {0}")]
    Projection(#[from] projection::ProjectionError),

    #[error("Invalid canvas: {0}")]
    InvalidCanvas(String),

    #[error("Failed to load embedded font")]
    Font,

    #[error("Nothing to plot: {0}")]
    NoData(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
