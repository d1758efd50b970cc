//! Metadata store error types.

use thiserror::Error;

/// Metadata store operation errors.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("not found: {0}")]
    NotFound(String),

    /// An update matched no row: it was deleted or changed underneath us.
    #[error("concurrent modification: {0}")]
    Concurrency(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for metadata operations.
pub type MetadataResult<T> = std::result::Result<T, MetadataError>;

/// PostgreSQL: value too long for `VARCHAR(n)`.
const PG_STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

impl MetadataError {
    /// Classify a failed write, turning integrity violations into
    /// [`MetadataError::Constraint`].
    pub(crate) fn from_write(err: sqlx::Error, context: &str) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let violation = db_err.is_foreign_key_violation()
                    || db_err.is_check_violation()
                    || db_err.is_unique_violation()
                    || matches!(db_err.kind(), sqlx::error::ErrorKind::NotNullViolation)
                    || db_err.code().as_deref() == Some(PG_STRING_DATA_RIGHT_TRUNCATION);
                if violation {
                    MetadataError::Constraint(format!("{context}: {}", db_err.message()))
                } else {
                    MetadataError::Database(sqlx::Error::Database(db_err))
                }
            }
            other => MetadataError::Database(other),
        }
    }
}

impl From<std::io::Error> for MetadataError {
    fn from(e: std::io::Error) -> Self {
        MetadataError::Config(e.to_string())
    }
}
