//! Diff work items and planned patches

use crate::shared::models::{NodeId, NodeKind};

/// A pair of nodes believed to correspond, valid for one diff call.
/// `original` lives in the previous snapshot, `changed` in the new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkItem {
    pub original: NodeId,
    pub changed: NodeId,
}

impl WorkItem {
    pub fn new(original: NodeId, changed: NodeId) -> Self {
        Self { original, changed }
    }
}

/// Edge patch decided during planning. Handles named `original`/`parent`
/// point into the previous snapshot, the others into the changed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOp {
    RemoveField { field: NodeId },
    ReplaceField { original: NodeId, replacement: NodeId },
    AddField { parent: NodeId, field: NodeId },
    RemoveFunction { function: NodeId },
    ReplaceFunction { original: NodeId, replacement: NodeId },
    AddFunction { parent: NodeId, function: NodeId },
}

impl PatchOp {
    pub fn is_replacement(&self) -> bool {
        matches!(self, PatchOp::ReplaceField { .. } | PatchOp::ReplaceFunction { .. })
    }

    pub fn is_addition(&self) -> bool {
        matches!(self, PatchOp::AddField { .. } | PatchOp::AddFunction { .. })
    }

    pub fn is_removal(&self) -> bool {
        matches!(self, PatchOp::RemoveField { .. } | PatchOp::RemoveFunction { .. })
    }
}

/// Why a subtree could not be mapped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The unit exists in only one of the snapshots
    UnpairedUnit,
    /// The unit roots themselves differ
    RootMismatch,
    /// A child that is neither a field nor a function has no partner
    UnmatchedChild { kind: NodeKind, name: Option<String> },
    /// An added member could change what an existing use of its name binds
    RebindsName { name: String },
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbortReason::UnpairedUnit => write!(f, "unit has no counterpart"),
            AbortReason::RootMismatch => write!(f, "unit roots differ"),
            AbortReason::UnmatchedChild { kind, name: Some(name) } => {
                write!(f, "unmatched {} '{}'", kind, name)
            }
            AbortReason::UnmatchedChild { kind, name: None } => write!(f, "unmatched {}", kind),
            AbortReason::RebindsName { name } => write!(f, "added '{}' may rebind existing uses", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbortedSubtree {
    pub unit: String,
    pub node: NodeId,
    pub reason: AbortReason,
}

/// Everything decided about one unit pair
#[derive(Debug, Clone, Default)]
pub struct UnitPlan {
    pub name: String,
    pub matched: usize,
    pub ops: Vec<PatchOp>,
    /// Expressions of the original graph to resolve again after patching
    pub rebind: Vec<NodeId>,
    pub aborted: Vec<AbortedSubtree>,
}

impl UnitPlan {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_reusable(&self) -> bool {
        self.aborted.is_empty()
    }

    pub(crate) fn abort(&mut self, node: NodeId, reason: AbortReason) {
        self.aborted.push(AbortedSubtree {
            unit: self.name.clone(),
            node,
            reason,
        });
    }
}

/// Result of the read-only planning phase over all units
#[derive(Debug, Clone, Default)]
pub struct ChangePlan {
    pub units: Vec<UnitPlan>,
}

impl ChangePlan {
    /// True only when every unit was paired and fully matched
    pub fn is_reusable(&self) -> bool {
        self.units.iter().all(UnitPlan::is_reusable)
    }

    pub fn aborted(&self) -> impl Iterator<Item = &AbortedSubtree> {
        self.units.iter().flat_map(|unit| unit.aborted.iter())
    }
}
