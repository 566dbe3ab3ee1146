//! Graph errors
//!
//! All of these are logic errors in the caller (a frontend or a pass); they
//! are returned instead of panicking so the driver can name the offender.

use thiserror::Error;

use crate::shared::models::{EdgeId, NodeId, View};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("node {0} does not exist in this graph")]
    UnknownNode(NodeId),

    #[error("edge {0} does not exist in this graph")]
    UnknownEdge(EdgeId),

    #[error("node {child} already has structural parent {existing}; cannot attach it to {requested}")]
    StructuralParentConflict {
        child: NodeId,
        existing: NodeId,
        requested: NodeId,
    },

    #[error("structural edge {parent} -> {child} would make {child} its own ancestor")]
    StructuralCycle { parent: NodeId, child: NodeId },

    #[error("cannot retarget {edge} in view {view}: structural edges are moved with reattach")]
    StructuralRetarget { edge: EdgeId, view: View },

    #[error("unbalanced structure: closing {found} but {expected:?} is open")]
    UnbalancedStructure {
        expected: Option<NodeId>,
        found: NodeId,
    },
}

pub type GraphResult<T> = Result<T, GraphError>;
