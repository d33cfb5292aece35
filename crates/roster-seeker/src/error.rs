//! Error types for the seeker crate.

use thiserror::Error;

/// Errors raised while matching, sorting, or mutating observed collections.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeekerError {
    /// The record does not expose the field a strategy is bound to.
    #[error("record has no field '{field}'")]
    MissingField { field: String },

    /// Positional access past the end of an observable list.
    #[error("index {index} is out of bounds for a list of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Unrecognized sort direction name.
    #[error("invalid sort direction '{0}' (expected 'asc' or 'desc')")]
    InvalidDirection(String),

    /// Unrecognized text operator name.
    #[error("invalid text operator '{0}'")]
    InvalidOperator(String),

    /// Sort specification without a field name.
    #[error("sort specification '{0}' has no field name")]
    EmptySortField(String),
}

/// Result type for seeker operations.
pub type Result<T> = std::result::Result<T, SeekerError>;
