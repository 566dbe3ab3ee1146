//! Traversal strategies
//!
//! Two modes over the same strategy table:
//! - [`Successors`]: raw successor iterator, no deduplication. Consumers that
//!   need path sensitivity walk it themselves and own termination.
//! - [`Walk`]: breadth-first, each reachable node yielded at most once, so it
//!   terminates on the cyclic control-flow and data-flow views.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::shared::models::{NodeId, View};

use super::store::CodePropertyGraph;

/// Direction in which a strategy follows edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// How to obtain the successors of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// No successors
    None,
    /// Structural children
    StructureForward,
    ControlForward,
    ControlBackward,
    DataflowForward,
    DataflowBackward,
}

impl Strategy {
    /// View and direction followed, `None` for [`Strategy::None`]
    pub fn view(&self) -> Option<(View, Direction)> {
        match self {
            Strategy::None => None,
            Strategy::StructureForward => Some((View::Ast, Direction::Forward)),
            Strategy::ControlForward => Some((View::ControlFlow, Direction::Forward)),
            Strategy::ControlBackward => Some((View::ControlFlow, Direction::Backward)),
            Strategy::DataflowForward => Some((View::DataFlow, Direction::Forward)),
            Strategy::DataflowBackward => Some((View::DataFlow, Direction::Backward)),
        }
    }

    /// Strategy following the same view the other way
    pub fn reversed(&self) -> Strategy {
        match self {
            Strategy::None | Strategy::StructureForward => Strategy::None,
            Strategy::ControlForward => Strategy::ControlBackward,
            Strategy::ControlBackward => Strategy::ControlForward,
            Strategy::DataflowForward => Strategy::DataflowBackward,
            Strategy::DataflowBackward => Strategy::DataflowForward,
        }
    }

    /// Raw successors of `node`
    pub fn successors<'g>(&self, graph: &'g CodePropertyGraph, node: NodeId) -> Successors<'g> {
        let (edges, direction) = match self.view() {
            Some((view, Direction::Forward)) => (graph.outgoing_ids(node, view), Direction::Forward),
            Some((view, Direction::Backward)) => (graph.incoming_ids(node, view), Direction::Backward),
            None => (&[][..], Direction::Forward),
        };
        Successors {
            graph,
            edges: edges.iter(),
            direction,
        }
    }
}

/// Insertion-ordered successors of one node. May repeat a node when several
/// parallel edges exist.
pub struct Successors<'g> {
    graph: &'g CodePropertyGraph,
    edges: std::slice::Iter<'g, crate::shared::models::EdgeId>,
    direction: Direction,
}

impl Iterator for Successors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        for id in self.edges.by_ref() {
            if let Some(edge) = self.graph.edge(*id) {
                return Some(match self.direction {
                    Direction::Forward => edge.target,
                    Direction::Backward => edge.source,
                });
            }
        }
        None
    }
}

/// Deduplicating breadth-first walk from one or more start nodes.
///
/// Start nodes are yielded first, in the given order.
pub struct Walk<'g> {
    graph: &'g CodePropertyGraph,
    strategy: Strategy,
    queue: VecDeque<NodeId>,
    visited: FxHashSet<NodeId>,
}

impl<'g> Walk<'g> {
    pub fn new(graph: &'g CodePropertyGraph, strategy: Strategy, start: NodeId) -> Self {
        Self::from_many(graph, strategy, [start])
    }

    pub fn from_many(
        graph: &'g CodePropertyGraph,
        strategy: Strategy,
        starts: impl IntoIterator<Item = NodeId>,
    ) -> Self {
        let mut walk = Self {
            graph,
            strategy,
            queue: VecDeque::new(),
            visited: FxHashSet::default(),
        };
        for start in starts {
            if graph.contains(start) && walk.visited.insert(start) {
                walk.queue.push_back(start);
            }
        }
        walk
    }

    pub fn visited(&self, node: NodeId) -> bool {
        self.visited.contains(&node)
    }
}

impl Iterator for Walk<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.queue.pop_front()?;
        for next in self.strategy.successors(self.graph, node) {
            if self.visited.insert(next) {
                self.queue.push_back(next);
            }
        }
        Some(node)
    }
}

impl CodePropertyGraph {
    /// Raw successor iterator for `strategy`
    pub fn successors(&self, node: NodeId, strategy: Strategy) -> Successors<'_> {
        strategy.successors(self, node)
    }

    /// Every node reachable from `start` under `strategy`, each once
    pub fn walk(&self, start: NodeId, strategy: Strategy) -> Walk<'_> {
        Walk::new(self, strategy, start)
    }
}
