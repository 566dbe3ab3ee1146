//! Pass abstraction
//!
//! A pass is one unit of graph enrichment. Its [`PassDescriptor`] declares
//! identity, dependencies and ordering markers; the scheduler only ever looks
//! at descriptors.

use rustc_hash::FxHashSet;
use thiserror::Error;

use super::cancellation::CancellationToken;
use crate::features::graph::{CodePropertyGraph, GraphError};
use crate::features::scope::{ScopeError, ScopeManager};
use crate::shared::models::NodeId;

/// Pass identity; two passes with the same id are the same pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PassId(&'static str);

impl PassId {
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for PassId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Declared scheduling properties of a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassDescriptor {
    pub id: PassId,
    /// Always scheduled before this pass, injected when not requested
    pub hard_dependencies: Vec<PassId>,
    /// Scheduled before this pass only when present
    pub soft_dependencies: Vec<PassId>,
    pub is_first: bool,
    pub is_last: bool,
}

impl PassDescriptor {
    pub fn new(id: PassId) -> Self {
        Self {
            id,
            hard_dependencies: Vec::new(),
            soft_dependencies: Vec::new(),
            is_first: false,
            is_last: false,
        }
    }

    pub fn depends_on(mut self, dependency: PassId) -> Self {
        self.hard_dependencies.push(dependency);
        self
    }

    pub fn soft_depends_on(mut self, dependency: PassId) -> Self {
        self.soft_dependencies.push(dependency);
        self
    }

    pub fn first(mut self) -> Self {
        self.is_first = true;
        self
    }

    pub fn last(mut self) -> Self {
        self.is_last = true;
        self
    }

    /// Dependencies that constrain the order given the set of present passes
    pub fn effective_dependencies<'a>(
        &'a self,
        present: &'a FxHashSet<PassId>,
    ) -> impl Iterator<Item = PassId> + 'a {
        self.hard_dependencies.iter().copied().chain(
            self.soft_dependencies
                .iter()
                .copied()
                .filter(move |dep| present.contains(dep)),
        )
    }
}

#[derive(Debug, Error)]
pub enum PassError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl PassError {
    pub fn invariant(reason: impl Into<String>) -> Self {
        Self::Invariant(reason.into())
    }
}

/// What a pass run should cover
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PassTargets {
    /// Every translation unit
    #[default]
    Units,
    /// Only the subtrees rooted at these nodes (after an incremental patch)
    Dirty(Vec<NodeId>),
}

/// Everything a pass may touch while it runs
pub struct PassContext<'a> {
    graph: &'a mut CodePropertyGraph,
    scopes: &'a ScopeManager,
    targets: &'a PassTargets,
    cancellation: &'a CancellationToken,
}

impl<'a> PassContext<'a> {
    pub fn new(
        graph: &'a mut CodePropertyGraph,
        scopes: &'a ScopeManager,
        targets: &'a PassTargets,
        cancellation: &'a CancellationToken,
    ) -> Self {
        Self {
            graph,
            scopes,
            targets,
            cancellation,
        }
    }

    pub fn graph(&self) -> &CodePropertyGraph {
        &*self.graph
    }

    pub fn graph_mut(&mut self) -> &mut CodePropertyGraph {
        &mut *self.graph
    }

    pub fn scopes(&self) -> &ScopeManager {
        self.scopes
    }

    /// Split borrow for passes that read scopes while mutating the graph
    pub fn parts(&mut self) -> (&mut CodePropertyGraph, &ScopeManager) {
        (&mut *self.graph, self.scopes)
    }

    pub fn targets(&self) -> &PassTargets {
        self.targets
    }

    /// Cancellation is honoured between passes; long passes may check it to
    /// stop early, leaving a partially enriched graph.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Subtree roots this run covers, in a stable order
    pub fn roots(&self) -> Vec<NodeId> {
        match self.targets {
            PassTargets::Units => self.graph.units().to_vec(),
            PassTargets::Dirty(nodes) => nodes
                .iter()
                .copied()
                .filter(|node| self.graph.contains(*node))
                .collect(),
        }
    }

    /// Every node under the target roots, each once, in pre-order
    pub fn target_nodes(&self) -> Vec<NodeId> {
        let mut seen = FxHashSet::default();
        self.roots()
            .into_iter()
            .flat_map(|root| self.graph.descendants(root))
            .filter(|node| seen.insert(*node))
            .collect()
    }
}

/// An enrichment pass
pub trait Pass: Send {
    fn descriptor(&self) -> PassDescriptor;

    fn run(&mut self, ctx: &mut PassContext<'_>) -> Result<(), PassError>;
}

impl std::fmt::Debug for dyn Pass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Pass({})", self.descriptor().id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_dependencies_filter_soft() {
        let a = PassId::new("a");
        let b = PassId::new("b");
        let c = PassId::new("c");
        let descriptor = PassDescriptor::new(PassId::new("d"))
            .depends_on(a)
            .soft_depends_on(b)
            .soft_depends_on(c);

        let present: FxHashSet<PassId> = [a, c].into_iter().collect();
        let deps: Vec<PassId> = descriptor.effective_dependencies(&present).collect();

        assert_eq!(deps, vec![a, c]);
    }

    #[test]
    fn test_pass_id_display() {
        assert_eq!(PassId::new("control-flow").to_string(), "control-flow");
    }
}
