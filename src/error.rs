//! Error handling for article processing
//!
//! Typed errors using thiserror. Row-resolution failures (unknown action,
//! missing identifier, lookup miss) never appear here: they travel inline on
//! the returned article so a mass upload can report them per row. This
//! taxonomy covers the persistence seam and the commit step only.

use thiserror::Error;

/// Errors surfaced by the store and by [`crate::processing::ArticleProcessor::commit`].
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Uniqueness violation: {0}")]
    UniquenessViolation(String),

    #[error("Article not found: {0}")]
    NotFound(String),
}

/// Result type for store and commit operations
pub type ProcessingResult<T> = Result<T, ProcessingError>;

#[cfg(feature = "database")]
impl From<sqlx::Error> for ProcessingError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ProcessingError::NotFound(err.to_string()),
            other => ProcessingError::Database(other.to_string()),
        }
    }
}
