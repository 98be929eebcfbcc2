//! # Domain Errors
//!
//! Error types for the document store.
//!
//! ## Design Principles
//!
//! - User errors (bad identifier, bad JSON, limit violations, missing undo)
//!   are kept apart from storage failures so the HTTP layer can map them
//!   to 4xx and 5xx respectively
//! - No panics in domain logic (use Result instead)

use std::path::PathBuf;

/// Structural limit violations reported by the validator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// An object carries more keys than allowed.
    #[error("object has {count} keys, maximum allowed is {limit}")]
    TooManyKeys { count: usize, limit: usize },

    /// A complex value sits deeper than the nesting limit.
    #[error("nesting level {level} exceeds maximum allowed ({max})")]
    NestingTooDeep { level: usize, max: usize },
}

/// Reasons a caller-supplied identifier is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("identifier is empty")]
    Empty,

    #[error("identifier is {len} characters long, maximum is {max}")]
    TooLong { len: usize, max: usize },

    /// Only `[A-Za-z0-9_-]` is accepted so an id can never escape the data directory.
    #[error("identifier contains invalid character {ch:?}")]
    InvalidCharacter { ch: char },
}

/// Failures of the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filesystem I/O failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An existing record could not be parsed as JSON.
    #[error("corrupt document at {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A document could not be serialized for writing.
    #[error("serialization error: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors surfaced by `DocumentService` operations.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierError),

    /// The request body is not valid JSON.
    #[error("invalid JSON format: {0}")]
    MalformedInput(String),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// No stored document exists for the identifier.
    #[error("document not found: {0}")]
    NotFound(String),

    /// The identifier has no pending undo snapshot.
    #[error("no undo available for {0}")]
    NoUndoAvailable(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl DocumentError {
    /// True for errors caused by the caller rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, DocumentError::Storage(_))
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(e: serde_json::Error) -> Self {
        DocumentError::MalformedInput(e.to_string())
    }
}
