//! # Ports
//!
//! - `inbound`: the API this crate offers to the HTTP gateway
//! - `outbound`: the storage interface this crate requires

pub mod inbound;
pub mod outbound;
