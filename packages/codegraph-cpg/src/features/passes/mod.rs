//! Built-in enrichment passes

mod call_resolver;
mod control_flow;
mod data_flow;
pub mod resolution;
mod symbol_resolver;
mod type_hierarchy;
mod unreachable_code;

pub use call_resolver::CallResolverPass;
pub use control_flow::ControlFlowPass;
pub use data_flow::DataFlowPass;
pub use symbol_resolver::SymbolResolverPass;
pub use type_hierarchy::TypeHierarchyPass;
pub use unreachable_code::UnreachableCodePass;
