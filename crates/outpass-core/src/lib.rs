//! Service plumbing shared by the outpass binaries: tracing setup, request-id
//! layer, health probes and wire-format helpers.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
