//! Diff outcome reporting

use super::work_item::{AbortedSubtree, ChangePlan};
use crate::shared::models::NodeId;

/// Per-unit counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitChange {
    pub name: String,
    pub matched: usize,
    pub replaced: usize,
    pub added: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeReport {
    pub units: Vec<UnitChange>,
    pub aborted: Vec<AbortedSubtree>,
    /// Nodes whose enrichment must be recomputed after patching
    pub dirty: Vec<NodeId>,
    /// Call/reference edges moved to a replacement
    pub repointed: usize,
    /// Call edges dropped because the signature no longer binds
    pub dropped: usize,
    /// References cleared because their target was removed
    pub cleared: usize,
}

impl ChangeReport {
    pub fn from_plan(plan: &ChangePlan) -> Self {
        let units = plan
            .units
            .iter()
            .map(|unit| UnitChange {
                name: unit.name.clone(),
                matched: unit.matched,
                replaced: unit.ops.iter().filter(|op| op.is_replacement()).count(),
                added: unit.ops.iter().filter(|op| op.is_addition()).count(),
                removed: unit.ops.iter().filter(|op| op.is_removal()).count(),
            })
            .collect();
        Self {
            units,
            aborted: plan.aborted().cloned().collect(),
            ..Self::default()
        }
    }

    /// Full re-analysis not needed
    pub fn is_reusable(&self) -> bool {
        self.aborted.is_empty()
    }

    pub fn replaced(&self) -> usize {
        self.units.iter().map(|u| u.replaced).sum()
    }

    pub fn added(&self) -> usize {
        self.units.iter().map(|u| u.added).sum()
    }

    pub fn removed(&self) -> usize {
        self.units.iter().map(|u| u.removed).sum()
    }

    pub fn unit(&self, name: &str) -> Option<&UnitChange> {
        self.units.iter().find(|u| u.name == name)
    }
}
