//! Error types shared by the result tree crates
//!
//! One enum covers the entity model, the store and the exporters so callers
//! can match on a single taxonomy. We use `thiserror` for the `Display` and
//! `Error` implementations.

use crate::id::ResultId;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for result tree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the result tree
#[derive(Debug, Error)]
pub enum Error {
    /// Caller bug: bad segment, ragged table row, bad config value
    #[error("Validation error: {0}")]
    Validation(String),

    /// No node registered under this ID (kept as given, even if malformed)
    #[error("Result not found: {0}")]
    NotFound(String),

    /// A payload accessor was used on a node of another kind
    #[error("Result {id} is a {actual}, not a {expected}")]
    WrongKind {
        /// Node that was accessed
        id: ResultId,
        /// Kind the caller asked for
        expected: &'static str,
        /// Kind the node actually has
        actual: &'static str,
    },

    /// Persisted snapshot could not be decoded
    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// Persisted snapshot names a kind this build does not know
    #[error("Unknown result type '{kind}' for result {id}")]
    UnknownResultType {
        /// Node carrying the unknown discriminator
        id: String,
        /// The discriminator as read from disk
        kind: String,
    },

    /// A figure's artifact file is not on disk
    #[error("Missing artifact for result {id}: {}", path.display())]
    MissingArtifact {
        /// Figure node
        id: ResultId,
        /// Where the artifact was expected
        path: PathBuf,
    },

    /// Figure asked to capture the active plotting surface but none is attached
    #[error("No plotting surface attached to capture figure {0}")]
    NoPlotSurface(ResultId),

    /// Output destination exists and overwriting was not requested
    #[error("Destination already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// Replacing the destination would delete the results directory
    #[error("Export destination {} contains the results directory {}", destination.display(), results.display())]
    UnsafeDestination {
        /// Requested export destination
        destination: PathBuf,
        /// Directory the store lives in
        results: PathBuf,
    },

    /// I/O error (snapshot, artifacts, export output)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl Error {
    /// Shorthand for a validation failure
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}
