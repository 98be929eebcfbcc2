//! # Adapters Module
//!
//! ## Modules
//!
//! - `storage`: file-backed and in-memory `DocumentStore` implementations
//! - `guard`: per-identifier reader/writer locks
//! - `ledger`: single-slot undo snapshots

pub mod guard;
pub mod ledger;
pub mod storage;

pub use guard::{ConcurrencyGuard, DocumentLock};
pub use ledger::UndoLedger;
pub use storage::{FileDocumentStore, InMemoryDocumentStore};
