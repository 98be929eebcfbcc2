use crate::domain::empty_document;
use crate::domain::errors::StorageError;
use crate::domain::identifier::DocumentId;
use crate::domain::Document;
use crate::ports::outbound::DocumentStore;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, SystemTime};

struct Record {
    document: Document,
    modified: SystemTime,
}

/// In-memory document store for unit tests.
///
/// Production uses `FileDocumentStore`.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    records: RwLock<HashMap<DocumentId, Record>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Override a record's modification time to simulate ageing.
    pub fn set_modified(&self, id: &DocumentId, modified: SystemTime) {
        if let Some(record) = self.records.write().get_mut(id) {
            record.modified = modified;
        }
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn read(&self, id: &DocumentId) -> Result<Document, StorageError> {
        Ok(self
            .records
            .read()
            .get(id)
            .map(|r| r.document.clone())
            .unwrap_or_else(empty_document))
    }

    fn write(&self, id: &DocumentId, document: &Document) -> Result<(), StorageError> {
        self.records.write().insert(
            id.clone(),
            Record {
                document: document.clone(),
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }

    fn exists(&self, id: &DocumentId) -> bool {
        self.records.read().contains_key(id)
    }

    fn modified_at(&self, id: &DocumentId) -> Option<SystemTime> {
        self.records.read().get(id).map(|r| r.modified)
    }

    fn stale(&self, max_age: Duration) -> Result<Vec<DocumentId>, StorageError> {
        let now = SystemTime::now();
        Ok(self
            .records
            .read()
            .iter()
            .filter(|(_, r)| now.duration_since(r.modified).map_or(false, |age| age > max_age))
            .map(|(id, _)| id.clone())
            .collect())
    }

    fn remove(&self, id: &DocumentId) -> Result<(), StorageError> {
        self.records.write().remove(id);
        Ok(())
    }
}
