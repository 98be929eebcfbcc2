//! # Document Service
//!
//! Implements `DocumentApi` on top of a `DocumentStore`.
//!
//! Every operation on an identifier runs under that identifier's lock from
//! the `ConcurrencyGuard`: reads share it, writes hold it exclusively. Locks
//! are blocking, so async callers should dispatch through `spawn_blocking`
//! so an operation that has started always runs to completion.


use crate::adapters::{ConcurrencyGuard, UndoLedger};
use crate::domain::errors::DocumentError;
use crate::domain::identifier::DocumentId;
use crate::domain::limits::ValidationLimits;
use crate::domain::normalize::normalize_table;
use crate::domain::Document;
use crate::ports::inbound::DocumentApi;
use crate::ports::outbound::DocumentStore;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

/// Collaborators for `DocumentService`, built once at process start.
pub struct DocumentServiceDependencies<S> {
    pub store: S,
    pub guard: ConcurrencyGuard,
    pub ledger: UndoLedger,
}

impl<S: DocumentStore> DocumentServiceDependencies<S> {
    /// Fresh lock map and ledger around `store`.
    pub fn with_store(store: S) -> Self {
        Self {
            store,
            guard: ConcurrencyGuard::new(),
            ledger: UndoLedger::new(),
        }
    }
}

/// The document service.
pub struct DocumentService<S: DocumentStore> {
    store: S,
    guard: ConcurrencyGuard,
    ledger: UndoLedger,
    limits: ValidationLimits,
    /// Rectangularize uploaded tables before validation.
    normalize_uploads: bool,
}

impl<S: DocumentStore> DocumentService<S> {
    pub fn new(store: S, limits: ValidationLimits, normalize_uploads: bool) -> Self {
        Self::with_dependencies(
            DocumentServiceDependencies::with_store(store),
            limits,
            normalize_uploads,
        )
    }

    pub fn with_dependencies(
        deps: DocumentServiceDependencies<S>,
        limits: ValidationLimits,
        normalize_uploads: bool,
    ) -> Self {
        Self {
            store: deps.store,
            guard: deps.guard,
            ledger: deps.ledger,
            limits,
            normalize_uploads,
        }
    }

    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn guard(&self) -> &ConcurrencyGuard {
        &self.guard
    }

    pub fn ledger(&self) -> &UndoLedger {
        &self.ledger
    }

    pub fn normalizes_uploads(&self) -> bool {
        self.normalize_uploads
    }
}

impl<S: DocumentStore> DocumentApi for DocumentService<S> {
    fn get(&self, id: &DocumentId) -> Result<Document, DocumentError> {
        let lock = self.guard.lock_for(id);
        let _read = lock.read();
        Ok(self.store.read(id)?)
    }

    fn replace(&self, id: &DocumentId, document: Document) -> Result<(), DocumentError> {
        let lock = self.guard.lock_for(id);
        let _write = lock.write();

        // Snapshot first: a rejected document still leaves the prior content
        // as the undo target.
        match self.store.read(id) {
            Ok(current) => self.ledger.snapshot(id, current),
            Err(e) => {
                warn!(id = %id, error = %e, "could not snapshot document before replace");
                self.ledger.discard(id);
            }
        }

        if let Err(e) = self.limits.validate(&document) {
            debug!(id = %id, error = %e, "replace rejected");
            return Err(e.into());
        }

        self.store.write(id, &document)?;
        info!(id = %id, "document replaced");
        Ok(())
    }

    fn upload(&self, raw: &[u8]) -> Result<DocumentId, DocumentError> {
        let mut document: Document = serde_json::from_slice(raw)?;

        if self.normalize_uploads && normalize_table(&mut document) {
            debug!("uploaded table normalized");
        }
        self.limits.validate(&document)?;

        let id = DocumentId::generate();
        let lock = self.guard.lock_for(&id);
        let _write = lock.write();
        self.store.write(&id, &document)?;

        info!(id = %id, bytes = raw.len(), "document uploaded");
        Ok(id)
    }

    fn download(&self, id: &DocumentId) -> Result<Document, DocumentError> {
        let lock = self.guard.lock_for(id);
        let _read = lock.read();

        if !self.store.exists(id) {
            return Err(DocumentError::NotFound(id.to_string()));
        }
        Ok(self.store.read(id)?)
    }

    fn undo(&self, id: &DocumentId) -> Result<(), DocumentError> {
        let lock = self.guard.lock_for(id);
        let _write = lock.write();

        let snapshot = self
            .ledger
            .consume(id)
            .ok_or_else(|| DocumentError::NoUndoAvailable(id.to_string()))?;

        // Snapshots were valid or pre-existing content; restore as-is.
        if let Err(e) = self.store.write(id, &snapshot) {
            self.ledger.snapshot(id, snapshot);
            return Err(e.into());
        }

        info!(id = %id, "document restored from snapshot");
        Ok(())
    }

    /// Store `document` under `id` unless a record already exists.
    ///
    /// Returns `true` if the document was written. The document must pass
    /// validation; no undo snapshot is taken.
    fn seed(&self, id: &DocumentId, document: Document) -> Result<bool, DocumentError> {
        let lock = self.guard.lock_for(id);
        let _write = lock.write();

        if self.store.exists(id) {
            debug!(id = %id, "seed skipped, document exists");
            return Ok(false);
        }

        self.limits.validate(&document)?;
        self.store.write(id, &document)?;
        info!(id = %id, "document seeded");
        Ok(true)
    }

    /// Remove documents not modified within `max_age`.
    ///
    /// Each candidate is rechecked under its write lock, so a document
    /// written after the listing survives. Its undo snapshot goes with it.
    /// Failures on single documents are logged and skipped.
    fn sweep_expired(&self, max_age: Duration) -> Result<usize, DocumentError> {
        let candidates = self.store.stale(max_age)?;
        let mut removed = 0;

        for id in candidates {
            let lock = self.guard.lock_for(&id);
            let _write = lock.write();

            let still_stale = self
                .store
                .modified_at(&id)
                .and_then(|modified| SystemTime::now().duration_since(modified).ok())
                .map_or(false, |age| age > max_age);
            if !still_stale {
                continue;
            }

            match self.store.remove(&id) {
                Ok(()) => {
                    self.ledger.discard(&id);
                    removed += 1;
                    debug!(id = %id, "expired document removed");
                }
                Err(e) => warn!(id = %id, error = %e, "failed to remove expired document"),
            }
        }

        if removed > 0 {
            info!(removed, "retention sweep complete");
        }
        Ok(removed)
    }
}
