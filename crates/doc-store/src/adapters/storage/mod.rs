//! Storage Adapters
//!
//! Implementations of the `DocumentStore` trait.

mod file;
mod memory;

pub use file::FileDocumentStore;
pub use memory::InMemoryDocumentStore;
