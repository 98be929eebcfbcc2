//! Middleware for the document gateway.
//!
//! Layer order: Request → Tracing (span + metrics) → Body limit → Handler

pub mod metrics;
pub mod tracing;

pub use metrics::{GatewayMetrics, RequestTimer};
pub use tracing::TracingLayer;
