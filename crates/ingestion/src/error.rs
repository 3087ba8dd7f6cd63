//! Error types for the ingestion crate.

use thiserror::Error;

/// Errors that can occur while preparing a case.
#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to read archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Archive entry escapes the destination: {0}")]
    UnsafeEntry(String),

    #[error("Failed to list directory: {0}")]
    Listing(#[from] walkdir::Error),

    #[error("Case file name is not valid UTF-8: {0}")]
    NonUtf8Name(String),

    #[error("No case files found in {0}")]
    EmptyCase(String),

    #[error("Malformed track file {path} at line {line}: {message}")]
    TrackParse {
        path: String,
        line: usize,
        message: String,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestionError>;
