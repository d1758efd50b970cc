//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{field} is {actual} characters long (maximum {max})")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("invalid date for {field}: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("invalid boolean for {field}: {value}")]
    InvalidFlag { field: &'static str, value: String },

    #[error("invalid image file name: {0}")]
    InvalidImageName(String),

    #[error("timestamp formatting error: {0}")]
    Format(#[from] time::error::Format),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
