//! Lexical scopes backing name resolution

pub mod error;
pub mod scope;
pub mod scope_manager;

pub use error::{ScopeError, ScopeResult};
pub use scope::{Scope, ScopeId, ScopeKind};
pub use scope_manager::ScopeManager;
