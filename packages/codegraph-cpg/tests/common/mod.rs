//! Common test utilities for codegraph-cpg
//!
//! This module provides a fixture frontend, source unit sets and
//! graph assertions shared by the integration tests.

#![allow(dead_code)]

mod assertions;
mod fixtures;

// Re-export all utilities
pub use assertions::*;
pub use fixtures::*;
