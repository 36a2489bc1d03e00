//! Error types for query evaluation.

use thiserror::Error;

use crate::postings::DocumentId;

/// The main error type for concord operations.
#[derive(Error, Debug)]
pub enum ConcordError {
    /// An AND / OR / exact-order query was given no terms.
    #[error("empty query: at least one term is required")]
    EmptyQuery,

    /// A single-term diagnostic lookup found no postings for the term.
    #[error("term not found: {0}")]
    TermNotFound(String),

    /// A positions lookup asked for a document the structure does not hold.
    #[error("document {0} not found in term positions")]
    DocumentNotFound(DocumentId),

    /// A document iterator was advanced past its end.
    #[error("document iterator exhausted")]
    Exhausted,

    /// Invalid argument supplied by the caller.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested field has no registered index.
    #[error("field not configured: {0}")]
    FieldNotConfigured(String),

    /// A positional operation was requested on a field indexed without positions.
    #[error("positions unavailable for field: {0}")]
    PositionsUnavailable(String),

    /// Failure reported by the underlying postings source.
    #[error("index error: {0}")]
    Index(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConcordError {
    /// Create an invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        ConcordError::InvalidArgument(msg.into())
    }

    /// Create an index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        ConcordError::Index(msg.into())
    }

    /// Create a term-not-found error.
    pub fn term_not_found<S: Into<String>>(term: S) -> Self {
        ConcordError::TermNotFound(term.into())
    }

    /// Create a field-not-configured error.
    pub fn field_not_configured<S: Into<String>>(field: S) -> Self {
        ConcordError::FieldNotConfigured(field.into())
    }

    /// Create a positions-unavailable error.
    pub fn positions_unavailable<S: Into<String>>(field: S) -> Self {
        ConcordError::PositionsUnavailable(field.into())
    }
}

/// Result type alias for operations that may fail with [`ConcordError`].
pub type Result<T> = std::result::Result<T, ConcordError>;
