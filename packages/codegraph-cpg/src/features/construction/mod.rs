//! Construction of per-unit graph fragments by frontends

pub mod unit_builder;

pub use unit_builder::{UnitBuilder, UnitFragment};
