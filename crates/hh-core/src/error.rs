//! Error types for the HH analysis

use thiserror::Error;

/// Analysis error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation error (malformed input collections or configuration)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Histogram booking or merge error
    #[error("Histogram error: {0}")]
    Histogram(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
