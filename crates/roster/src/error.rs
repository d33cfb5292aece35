//! Error types for the roster application.

use std::path::PathBuf;

use roster_seeker::SeekerError;
use thiserror::Error;

/// Errors raised while loading input or driving a session.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Failed to read a file.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write session output.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// Malformed JSON input.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Malformed YAML input.
    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// File extension is neither JSON nor YAML.
    #[error("unsupported record file '{0}' (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    /// A configured or requested field does not exist on a person.
    #[error("unknown field '{field}' (expected one of: {expected})")]
    UnknownField { field: String, expected: String },

    /// A session line could not be understood.
    #[error("{0}")]
    Command(String),

    /// Error from the search pipeline.
    #[error(transparent)]
    Seeker(#[from] SeekerError),
}

impl RosterError {
    /// Returns `true` for mistakes a session can report and move past.
    ///
    /// Everything else (I/O, malformed records) ends the session.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RosterError::Command(_)
                | RosterError::UnknownField { .. }
                | RosterError::Seeker(
                    SeekerError::IndexOutOfBounds { .. }
                        | SeekerError::InvalidDirection(_)
                        | SeekerError::InvalidOperator(_)
                        | SeekerError::EmptySortField(_)
                )
        )
    }
}

/// Result type for roster operations.
pub type Result<T> = std::result::Result<T, RosterError>;
