//! Single-slot undo snapshots.
//!
//! Each identifier holds at most one pending snapshot: the content that
//! preceded its most recent replace. Taking a new snapshot overwrites the old
//! one; consuming removes it.

use crate::domain::identifier::DocumentId;
use crate::domain::Document;
use dashmap::DashMap;

/// Pending undo snapshots keyed by identifier.
#[derive(Default)]
pub struct UndoLedger {
    snapshots: DashMap<DocumentId, Document>,
}

impl UndoLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `document` as the pending undo state, replacing any prior one.
    pub fn snapshot(&self, id: &DocumentId, document: Document) {
        self.snapshots.insert(id.clone(), document);
    }

    /// Take the pending snapshot, leaving none behind.
    pub fn consume(&self, id: &DocumentId) -> Option<Document> {
        self.snapshots.remove(id).map(|(_, document)| document)
    }

    /// Drop the pending snapshot, if any.
    pub fn discard(&self, id: &DocumentId) {
        self.snapshots.remove(id);
    }

    pub fn has_pending(&self, id: &DocumentId) -> bool {
        self.snapshots.contains_key(id)
    }

    /// Number of identifiers with a pending snapshot.
    pub fn pending(&self) -> usize {
        self.snapshots.len()
    }
}
