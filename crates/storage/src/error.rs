//! Storage error types.

use thiserror::Error;

/// Image storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid image name: {0}")]
    InvalidName(String),

    #[error("image naming error: {0}")]
    Naming(#[from] blog_core::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;
