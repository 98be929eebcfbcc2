//! # Inbound Ports (Driving Ports)
//!
//! The primary API of the document store.

use crate::domain::errors::DocumentError;
use crate::domain::identifier::DocumentId;
use crate::domain::Document;
use std::time::Duration;

/// Operations exposed to callers.
///
/// Every operation is atomic from the caller's point of view: operations on
/// the same identifier are serialized, operations on different identifiers
/// proceed independently.
pub trait DocumentApi: Send + Sync {
    /// Read a document.
    ///
    /// Returns an empty array if the identifier was never written.
    ///
    /// ## Errors
    ///
    /// - `Storage`: the existing record is unreadable or corrupt
    fn get(&self, id: &DocumentId) -> Result<Document, DocumentError>;

    /// Replace a document wholesale, keeping the previous content for undo.
    ///
    /// ## Errors
    ///
    /// - `Validation`: the new document violates the structural limits
    /// - `Storage`: the write failed; the previous content is untouched
    fn replace(&self, id: &DocumentId, document: Document) -> Result<(), DocumentError>;

    /// Store raw JSON bytes under a freshly generated identifier.
    ///
    /// ## Errors
    ///
    /// - `MalformedInput`: the bytes are not JSON
    /// - `Validation`: the (normalized) document violates the structural limits
    /// - `Storage`: the write failed
    fn upload(&self, raw: &[u8]) -> Result<DocumentId, DocumentError>;

    /// Read a document that must already exist.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no record for the identifier
    /// - `Storage`: the record is unreadable or corrupt
    fn download(&self, id: &DocumentId) -> Result<Document, DocumentError>;

    /// Restore the content that preceded the most recent replace.
    ///
    /// A snapshot can be restored once.
    ///
    /// ## Errors
    ///
    /// - `NoUndoAvailable`: no pending snapshot
    /// - `Storage`: the write failed
    fn undo(&self, id: &DocumentId) -> Result<(), DocumentError>;

    /// Store a document under `id` only if nothing is stored there yet.
    ///
    /// Returns `true` if the document was written.
    fn seed(&self, id: &DocumentId, document: Document) -> Result<bool, DocumentError>;

    /// Delete documents not modified within `max_age`, with their snapshots.
    ///
    /// Returns the number of documents removed.
    fn sweep_expired(&self, max_age: Duration) -> Result<usize, DocumentError>;
}
