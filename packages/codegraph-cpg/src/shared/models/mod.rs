//! Shared models

mod edge;
mod node;
mod span;
mod type_ref;

pub use edge::{Edge, EdgeId, EdgeProperties, View};
pub use node::{Node, NodeBuilder, NodeCategory, NodeId, NodeKind, NodeOffset};
pub use span::{Location, Span};
pub use type_ref::TypeRef;
