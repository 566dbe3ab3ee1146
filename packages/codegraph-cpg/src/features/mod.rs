//! Feature modules
//!
//! - graph/          - Graph model, views and traversal
//! - scope/          - Scope tree and name lookup
//! - construction/   - Per-unit builder handed to frontends
//! - passes/         - Built-in enrichment passes
//! - change_mapping/ - Incremental diff between snapshots

pub mod change_mapping;
pub mod construction;
pub mod graph;
pub mod passes;
pub mod scope;
