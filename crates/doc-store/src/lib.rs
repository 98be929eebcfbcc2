//! # Document Store
//!
//! Persistence and concurrency core for tabular JSON documents.
//!
//! ## Architecture
//!
//! ```text
//!   request(id) ──→ ConcurrencyGuard[id] ──→ DocumentService
//!                                              │    │    │
//!                          StructureValidator ←┘    │    └→ UndoLedger[id]
//!                                                   ↓
//!                                             DocumentStore
//!                                        (data_<id>.json files)
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Valid At Rest | Every stored document satisfies the structural limits |
//! | 2 | Single Snapshot | At most one pending undo snapshot per identifier |
//! | 3 | Per-Document Linearization | Same-id operations are serialized, different ids never block each other |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Identifiers, structural limits, upload normalization, errors
//! - `ports/` - Inbound API and outbound storage SPI
//! - `adapters/` - File and in-memory stores, lock map, undo ledger
//! - `service/` - Application service implementing the API
//!
//! ## Usage
//!
//! ```ignore
//! use doc_store::{DocumentApi, DocumentService, FileDocumentStore, ValidationLimits};
//!
//! let store = FileDocumentStore::open("data")?;
//! let service = DocumentService::new(store, ValidationLimits::default(), true);
//!
//! let id = service.upload(br#"[{"name":"Alpha"}]"#)?;
//! let table = service.get(&id)?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{ConcurrencyGuard, FileDocumentStore, InMemoryDocumentStore, UndoLedger};
pub use domain::errors::{DocumentError, IdentifierError, StorageError, ValidationError};
pub use domain::identifier::DocumentId;
pub use domain::limits::ValidationLimits;
pub use domain::normalize::normalize_table;
pub use domain::Document;
pub use ports::inbound::DocumentApi;
pub use ports::outbound::DocumentStore;
pub use service::{DocumentService, DocumentServiceDependencies};
