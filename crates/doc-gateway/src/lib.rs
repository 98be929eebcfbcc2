//! # Document Gateway
//!
//! HTTP surface of the tabular JSON document store.
//!
//! ## Architecture
//!
//! ```text
//!   client ──→ TracingLayer ──→ router ──spawn_blocking──→ DocumentApi
//!              (span, metrics)    │                         (doc-store)
//!                                 └── ApiError ──→ {"status":"error",...}
//!
//!   retention task ──every interval──→ DocumentApi::sweep_expired
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use doc_gateway::{GatewayConfig, GatewayService};
//!
//! let config = GatewayConfig::from_env();
//! let gateway = GatewayService::new(config, documents)?;
//! let listener = gateway.bind().await?;
//! gateway.run(listener, shutdown_signal()).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod middleware;
pub mod router;
pub mod service;

pub use domain::config::{ConfigError, GatewayConfig};
pub use domain::error::{ApiError, ApiResult, GatewayError};
pub use middleware::GatewayMetrics;
pub use router::build_router;
pub use service::{spawn_retention_task, GatewayService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
