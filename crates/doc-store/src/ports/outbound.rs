//! # Outbound Ports (Driven Ports)
//!
//! Persistence required by the document service.
//!
//! Production: `FileDocumentStore` (one pretty-printed JSON file per id)
//! Testing: `InMemoryDocumentStore`

use crate::domain::errors::StorageError;
use crate::domain::identifier::DocumentId;
use crate::domain::Document;
use std::time::{Duration, SystemTime};

/// Durable storage of one JSON document per identifier.
///
/// Implementations do not validate and do not lock; the service does both.
pub trait DocumentStore: Send + Sync {
    /// Read a document, or an empty array if no record exists.
    fn read(&self, id: &DocumentId) -> Result<Document, StorageError>;

    /// Replace a document wholesale.
    ///
    /// ## Atomicity
    ///
    /// Readers observe either the previous content or the new content, never
    /// a partial write.
    fn write(&self, id: &DocumentId, document: &Document) -> Result<(), StorageError>;

    /// Check whether a record exists.
    fn exists(&self, id: &DocumentId) -> bool;

    /// Last modification time of a record, if it exists.
    fn modified_at(&self, id: &DocumentId) -> Option<SystemTime>;

    /// Identifiers whose record was last modified more than `max_age` ago.
    fn stale(&self, max_age: Duration) -> Result<Vec<DocumentId>, StorageError>;

    /// Delete a record. Removing a missing record is not an error.
    fn remove(&self, id: &DocumentId) -> Result<(), StorageError>;
}
