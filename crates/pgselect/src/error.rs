//! Error types for pgselect.
//!
//! The builder surface is deliberately near-infallible: column names are
//! arbitrary strings and contradictory include/exclude sequences still
//! compile to well-formed SQL. Semantic validity against a real schema is
//! the executor's responsibility and surfaces as a database error there.

use thiserror::Error;

/// Result type alias for pgselect operations.
pub type QueryResult<T> = Result<T, QueryError>;

#[derive(Debug, Error)]
pub enum QueryError {
    /// Invalid builder input (e.g. a page number below 1).
    #[error("Validation error: {0}")]
    Validation(String),
}

impl QueryError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
