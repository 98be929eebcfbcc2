//! Cross-crate integration tests: `doc-gateway` routes over a real
//! `FileDocumentStore`.

#[cfg(test)]
mod harness;

mod concurrency;
mod http_flows;
mod persistence;
