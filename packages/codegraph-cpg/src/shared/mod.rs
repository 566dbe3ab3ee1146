//! Shared module - Common types and ports
//!
//! Types shared by every feature: the node/edge model and the frontend port.

pub mod models;
pub mod ports;

// Re-exports for convenience
pub use models::*;
