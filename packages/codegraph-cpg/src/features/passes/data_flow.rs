//! Data flow edges
//!
//! Per resolved reference: declaration → read, or value → written reference →
//! declaration for the left side of an `=`. Initializers flow into their
//! variable, arguments into their call and, once the call is bound, into the
//! matching parameter of each callee.

use tracing::debug;

use super::resolution::{INVOKES, REFERS_TO};
use super::{ControlFlowPass, SymbolResolverPass};
use crate::features::graph::CodePropertyGraph;
use crate::pipeline::{Pass, PassContext, PassDescriptor, PassError, PassId};
use crate::shared::models::{EdgeProperties, NodeId, NodeKind, View};

#[derive(Debug, Clone, Copy, Default)]
pub struct DataFlowPass;

impl DataFlowPass {
    pub const ID: PassId = PassId::new("data-flow");
}

impl Pass for DataFlowPass {
    fn descriptor(&self) -> PassDescriptor {
        PassDescriptor::new(Self::ID)
            .depends_on(SymbolResolverPass::ID)
            .depends_on(ControlFlowPass::ID)
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
        let nodes = ctx.target_nodes();
        let flows: Vec<(NodeId, NodeId)> = nodes
            .iter()
            .flat_map(|id| flows_of(ctx.graph(), *id))
            .collect();

        let graph = ctx.graph_mut();
        let before = graph.edges_in(View::DataFlow).count();
        for (source, target) in flows {
            graph.ensure_edge(View::DataFlow, source, target, EdgeProperties::new())?;
        }
        debug!(
            added = graph.edges_in(View::DataFlow).count() - before,
            "data flow built"
        );
        Ok(())
    }
}

fn flows_of(graph: &CodePropertyGraph, id: NodeId) -> Vec<(NodeId, NodeId)> {
    let Some(kind) = graph.kind(id) else {
        return Vec::new();
    };
    match kind {
        NodeKind::Reference | NodeKind::MemberAccess => reference_flows(graph, id),
        NodeKind::Variable => graph
            .children(id)
            .filter(|child| graph.kind(*child).map_or(false, |k| k.is_expression()))
            .map(|initializer| (initializer, id))
            .collect(),
        NodeKind::Call | NodeKind::Construct => argument_flows(graph, id),
        _ => Vec::new(),
    }
}

fn reference_flows(graph: &CodePropertyGraph, reference: NodeId) -> Vec<(NodeId, NodeId)> {
    let declarations: Vec<NodeId> = graph
        .outgoing(reference, View::Reference)
        .filter(|(_, edge)| edge.properties.is_named(REFERS_TO))
        .map(|(_, edge)| edge.target)
        .filter(|decl| graph.kind(*decl).map_or(false, |k| k.is_value_declaration()))
        .collect();
    if declarations.is_empty() {
        return Vec::new();
    }

    match assignment_value(graph, reference) {
        Some(value) => std::iter::once((value, reference))
            .chain(declarations.into_iter().map(|decl| (reference, decl)))
            .collect(),
        None => declarations.into_iter().map(|decl| (decl, reference)).collect(),
    }
}

/// Right-hand side when `reference` is the target of an assignment
fn assignment_value(graph: &CodePropertyGraph, reference: NodeId) -> Option<NodeId> {
    let parent = graph.parent(reference)?;
    let node = graph.node(parent)?;
    if node.kind != NodeKind::BinaryOperator || node.name() != Some("=") {
        return None;
    }
    let mut operands = graph.children(parent);
    if operands.next()? != reference {
        return None;
    }
    operands.next()
}

fn argument_flows(graph: &CodePropertyGraph, call: NodeId) -> Vec<(NodeId, NodeId)> {
    let arguments: Vec<NodeId> = graph
        .children(call)
        .filter(|arg| graph.child_role(*arg) != Some("receiver"))
        .collect();
    let mut flows: Vec<(NodeId, NodeId)> = arguments.iter().map(|arg| (*arg, call)).collect();

    let callees = graph
        .outgoing(call, View::Call)
        .filter(|(_, edge)| edge.properties.is_named(INVOKES))
        .map(|(_, edge)| edge.target);
    for callee in callees {
        let parameters = graph
            .children(callee)
            .filter(|child| graph.kind(*child) == Some(NodeKind::Parameter));
        flows.extend(arguments.iter().copied().zip(parameters));
    }
    flows
}
