//! Error types for docgraph.
//!
//! Every fallible operation in the workspace returns [`Result`]. Only a few
//! variants are fatal for a validation run (see [`Error::is_fatal`]); the
//! per-file variants are caught by the scanner and turned into skip/degraded
//! records instead of aborting.

use std::io;
use std::path::PathBuf;
use thiserror::Error as ThisError;

/// The core error type for all docgraph operations.
#[derive(ThisError, Debug)]
pub enum Error {
    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Corpus root is missing or is not a readable directory
    #[error("Corpus root unavailable: {path} ({reason})")]
    CorpusRootMissing { path: PathBuf, reason: String },

    /// The leading metadata block could not be parsed
    #[error("Malformed metadata: {reason}")]
    MalformedMetadata { reason: String },

    /// Invalid configuration
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    /// Serialization of a report or record failed
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// The run was cancelled before it completed
    #[error("Operation cancelled")]
    Cancelled,

    /// The run exceeded the caller's deadline
    #[error("Operation timed out after {millis} ms")]
    Timeout { millis: u128 },

    /// Generic unclassified error
    #[error("Error: {0}")]
    Other(String),
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an IO error
    pub fn io(err: io::Error) -> Self {
        Error::Io(err)
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Error::FileNotFound { path: path.into() }
    }

    /// Create a corpus root error
    pub fn corpus_root_missing(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::CorpusRootMissing {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed metadata error
    pub fn malformed_metadata(reason: impl Into<String>) -> Self {
        Error::MalformedMetadata {
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(reason: impl Into<String>) -> Self {
        Error::ConfigError {
            reason: reason.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization_error(reason: impl Into<String>) -> Self {
        Error::SerializationError {
            reason: reason.into(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Whether this error aborts a whole validation run.
    ///
    /// Per-file conditions (missing file, I/O, malformed metadata) are
    /// recovered by the scanner; everything else propagates to the caller.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Error::Io(_) | Error::FileNotFound { .. } | Error::MalformedMetadata { .. }
        )
    }
}
