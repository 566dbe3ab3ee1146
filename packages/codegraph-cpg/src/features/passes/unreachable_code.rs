//! Dead code marking
//!
//! Marks `ControlFlow` edges as `unreachable` when they leave a `return`, when
//! they take the arm a literal condition rules out, or when their source can
//! only be reached through such edges.

use rustc_hash::FxHashSet;
use tracing::debug;

use super::ControlFlowPass;
use crate::features::graph::CodePropertyGraph;
use crate::pipeline::{Pass, PassContext, PassDescriptor, PassError, PassId};
use crate::shared::models::{EdgeId, NodeId, NodeKind, View};

#[derive(Debug, Clone, Copy, Default)]
pub struct UnreachableCodePass;

impl UnreachableCodePass {
    pub const ID: PassId = PassId::new("unreachable-code");
}

impl Pass for UnreachableCodePass {
    fn descriptor(&self) -> PassDescriptor {
        PassDescriptor::new(Self::ID).depends_on(ControlFlowPass::ID).last()
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
        let graph = ctx.graph();
        let dead: Vec<EdgeId> = ctx
            .target_nodes()
            .into_iter()
            .filter(|id| graph.kind(*id).map_or(false, |k| k.is_function_like()))
            .flat_map(|function| dead_edges(graph, function))
            .collect();

        let graph = ctx.graph_mut();
        let mut marked = 0usize;
        for edge in dead {
            if let Some(properties) = graph.edge_properties_mut(edge) {
                if !properties.unreachable {
                    properties.unreachable = true;
                    marked += 1;
                }
            }
        }
        debug!(marked, "unreachable edges marked");
        Ok(())
    }
}

/// Statically known value of a literal condition
fn constant_condition(graph: &CodePropertyGraph, split: NodeId) -> Option<bool> {
    let condition = graph.child_by_role(split, "condition")?;
    let node = graph.node(condition)?;
    if node.kind != NodeKind::Literal {
        return None;
    }
    match node.code()? {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Whether the edge can never be taken, judged by its source alone
fn is_dead_edge(graph: &CodePropertyGraph, source: NodeId, branch: Option<bool>) -> bool {
    match graph.kind(source) {
        Some(NodeKind::Return) => true,
        Some(NodeKind::If | NodeKind::While | NodeKind::For) => {
            match (constant_condition(graph, source), branch) {
                (Some(value), Some(taken)) => value != taken,
                _ => false,
            }
        }
        _ => false,
    }
}

/// Dead edges in the evaluation order of `function`: locally dead edges plus
/// every edge leaving a node not reachable from the entry over live edges.
fn dead_edges(graph: &CodePropertyGraph, function: NodeId) -> Vec<EdgeId> {
    let mut reached: FxHashSet<NodeId> = FxHashSet::default();
    let mut stack = vec![function];
    while let Some(node) = stack.pop() {
        if !reached.insert(node) {
            continue;
        }
        for (_, edge) in graph.outgoing(node, View::ControlFlow) {
            if !edge.properties.unreachable
                && !is_dead_edge(graph, edge.source, edge.properties.branch)
            {
                stack.push(edge.target);
            }
        }
    }

    graph
        .descendants(function)
        .into_iter()
        .flat_map(|node| graph.outgoing(node, View::ControlFlow))
        .filter(|(_, edge)| {
            !reached.contains(&edge.source)
                || is_dead_edge(graph, edge.source, edge.properties.branch)
        })
        .map(|(id, _)| id)
        .collect()
}
