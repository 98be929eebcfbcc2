//! Per-document reader/writer locks.
//!
//! Maps each identifier to its own `RwLock`, created lazily on first access.
//! Concurrent first lookups for the same identifier go through the map's
//! entry API, so they always agree on a single lock instance.

use crate::domain::identifier::DocumentId;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared handle to one identifier's lock.
pub type DocumentLock = Arc<RwLock<()>>;

/// Identifier-scoped lock map.
///
/// Locks are never removed; the map is bounded by the number of distinct
/// identifiers seen during the process lifetime.
#[derive(Default)]
pub struct ConcurrencyGuard {
    locks: DashMap<DocumentId, DocumentLock>,
}

impl ConcurrencyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock for `id`, inserting a fresh one if absent.
    pub fn lock_for(&self, id: &DocumentId) -> DocumentLock {
        if let Some(lock) = self.locks.get(id) {
            return Arc::clone(lock.value());
        }
        Arc::clone(self.locks.entry(id.clone()).or_default().value())
    }

    /// Number of identifiers with a lock.
    pub fn tracked(&self) -> usize {
        self.locks.len()
    }
}
