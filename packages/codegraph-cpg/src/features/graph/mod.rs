//! Graph model and traversal
//!
//! One vertex set, six overlay views, handle-addressed adjacency lists.

pub mod error;
pub mod property_registry;
pub mod store;
pub mod traversal;
pub mod visitor;

pub use error::{GraphError, GraphResult};
pub use property_registry::{EdgePropertyRegistry, PropertyError};
pub use store::{Ancestors, CodePropertyGraph, GraphStats};
pub use traversal::{Direction, Strategy, Successors, Walk};
pub use visitor::{dispatch, walk_structure, NodeVisitor};
