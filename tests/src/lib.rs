//! # Document Store Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/
//! │   └── document_benchmarks.rs   # validator, normalizer, service throughput
//! └── src/integration/
//!     ├── harness.rs               # router over a temp data directory
//!     ├── http_flows.rs            # upload / edit / undo / download journeys
//!     ├── concurrency.rs           # same-id linearization, cross-id isolation
//!     └── persistence.rs           # restart, retention, on-disk layout
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p doc-tests
//! cargo test -p doc-tests integration::concurrency
//! cargo bench -p doc-tests
//! ```

pub mod integration;
