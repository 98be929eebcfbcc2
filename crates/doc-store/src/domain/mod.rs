//! # Domain Layer
//!
//! Pure logic with no I/O: identifiers, structural limits, upload
//! normalization and the error taxonomy.

pub mod errors;
pub mod identifier;
pub mod limits;
pub mod normalize;

/// An untyped JSON document: object, array, scalar or null.
pub type Document = serde_json::Value;

/// The value returned for an identifier that has never been written.
pub fn empty_document() -> Document {
    Document::Array(Vec::new())
}
