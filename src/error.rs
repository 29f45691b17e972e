//! Error types for the tscompose toolkit

use thiserror::Error;

/// Result type alias for tscompose operations
pub type Result<T> = std::result::Result<T, ComposeError>;

/// Main error type for transformer composition
#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("Duplicate output column names: {}", .names.join(", "))]
    DuplicateNames { names: Vec<String> },

    #[error("Transformer not fitted")]
    NotFitted,

    #[error("Operation not supported: {0}")]
    NotSupported(String),

    #[error("Data error: {0}")]
    Data(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<polars::error::PolarsError> for ComposeError {
    fn from(err: polars::error::PolarsError) -> Self {
        ComposeError::Data(err.to_string())
    }
}
