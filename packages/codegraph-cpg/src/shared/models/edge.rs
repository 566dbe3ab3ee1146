//! Typed, directed edges grouped into overlay views

use serde::{Deserialize, Serialize};

use super::node::NodeId;

/// Overlay a given edge belongs to.
///
/// All views share one vertex set; each keeps its own adjacency lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    /// Structural parent → child (a tree)
    Ast,
    /// Evaluation order, including branch arms and loop back-edges
    ControlFlow,
    /// Definition → use
    DataFlow,
    /// Call/construct expression → resolved target
    Call,
    /// Reference expression → declaration
    Reference,
    /// Scope owner → declaration registered in its scope
    Scope,
}

impl View {
    pub const COUNT: usize = 6;

    pub fn index(&self) -> usize {
        match self {
            View::Ast => 0,
            View::ControlFlow => 1,
            View::DataFlow => 2,
            View::Call => 3,
            View::Reference => 4,
            View::Scope => 5,
        }
    }

    pub fn all() -> &'static [View] {
        &[
            View::Ast,
            View::ControlFlow,
            View::DataFlow,
            View::Call,
            View::Reference,
            View::Scope,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Ast => "ast",
            View::ControlFlow => "control_flow",
            View::DataFlow => "data_flow",
            View::Call => "call",
            View::Reference => "reference",
            View::Scope => "scope",
        }
    }

    /// Views in which cycles are expected
    pub fn admits_cycles(&self) -> bool {
        matches!(self, View::ControlFlow | View::DataFlow | View::Call)
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opaque handle of an edge slot in the graph arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(u32);

impl EdgeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) fn shifted(self, by: usize) -> Self {
        Self(self.0 + by as u32)
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Optional edge properties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeProperties {
    /// Ordinal position (argument slot, child position)
    pub index: Option<u32>,
    /// Arm of a control split
    pub branch: Option<bool>,
    /// Edge leads into statically dead code
    pub unreachable: bool,
    /// Label, e.g. a structural role ("condition") or "invokes"
    pub name: Option<String>,
}

impl EdgeProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(mut self, index: u32) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_branch(mut self, branch: bool) -> Self {
        self.branch = Some(branch);
        self
    }

    pub fn with_unreachable(mut self, unreachable: bool) -> Self {
        self.unreachable = unreachable;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

/// A directed edge in exactly one view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub view: View,
    pub source: NodeId,
    pub target: NodeId,
    pub properties: EdgeProperties,
}

impl Edge {
    pub fn new(view: View, source: NodeId, target: NodeId, properties: EdgeProperties) -> Self {
        Self {
            view,
            source,
            target,
            properties,
        }
    }
}
