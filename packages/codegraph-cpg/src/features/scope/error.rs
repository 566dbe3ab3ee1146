//! Scope errors
//!
//! Misuse of the scope stack is an integration error in the frontend that
//! drives it. Every variant names the node and scope involved.

use thiserror::Error;

use super::scope::ScopeId;
use crate::features::graph::GraphError;
use crate::shared::models::{NodeId, NodeKind};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("leave({found}) does not match current scope {scope} owned by {expected:?}")]
    OwnerMismatch {
        expected: Option<NodeId>,
        found: NodeId,
        scope: ScopeId,
    },

    #[error("leave({owner}) attempted on the global scope")]
    LeaveGlobal { owner: NodeId },

    #[error("scope {0} does not exist")]
    UnknownScope(ScopeId),

    #[error("node {0} does not exist in the graph")]
    UnknownNode(NodeId),

    #[error("node {node} ({kind}) does not open a scope")]
    NotScopeOwner { node: NodeId, kind: NodeKind },

    #[error("node {node} ({kind}) is not a declaration")]
    NotDeclaration { node: NodeId, kind: NodeKind },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type ScopeResult<T> = Result<T, ScopeError>;
