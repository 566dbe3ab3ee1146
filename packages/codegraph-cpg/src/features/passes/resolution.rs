//! Lookup helpers shared by the resolver passes

use crate::features::change_mapping::comparison::{argument_types, signature, signature_accepts};
use crate::features::graph::CodePropertyGraph;
use crate::features::scope::ScopeManager;
use crate::shared::models::{NodeId, NodeKind, View};

/// Edge label from a reference to the declaration it resolved to
pub const REFERS_TO: &str = "refers_to";
/// Edge label from a call to a function it may invoke
pub const INVOKES: &str = "invokes";
/// Edge label from a construct expression to the record it creates
pub const INSTANTIATES: &str = "instantiates";

/// Record declaration named `name` visible from the scope of `at`
pub fn visible_record(
    graph: &CodePropertyGraph,
    scopes: &ScopeManager,
    at: NodeId,
    name: &str,
) -> Option<NodeId> {
    let scope = scopes.scope_for_node(graph, at);
    scopes
        .lookup_visible(scope, name)
        .into_iter()
        .find(|decl| graph.kind(*decl) == Some(NodeKind::Record))
}

/// Record declaration naming the (already resolved) type of `expr`
pub fn record_of_type(
    graph: &CodePropertyGraph,
    scopes: &ScopeManager,
    expr: NodeId,
) -> Option<NodeId> {
    let type_name = graph.node(expr)?.type_ref.name()?.to_owned();
    visible_record(graph, scopes, expr, &type_name)
}

/// Members of `record` called `name`
pub fn members_named<'g>(
    graph: &'g CodePropertyGraph,
    record: NodeId,
    name: &'g str,
) -> impl Iterator<Item = NodeId> + 'g {
    graph
        .children(record)
        .filter(move |member| graph.name(*member) == Some(name))
}

/// Function-like candidates among `candidates` that accept the arguments of
/// `call`
pub fn accepting(
    graph: &CodePropertyGraph,
    call: NodeId,
    candidates: impl IntoIterator<Item = NodeId>,
) -> Vec<NodeId> {
    let arguments = argument_types(graph, call);
    candidates
        .into_iter()
        .filter(|candidate| graph.kind(*candidate).map_or(false, |k| k.is_function_like()))
        .filter(|candidate| signature_accepts(&signature(graph, *candidate), &arguments))
        .collect()
}

/// Whether `node` already carries a resolution edge of `view` labelled `label`
pub fn is_resolved(graph: &CodePropertyGraph, node: NodeId, view: View, label: &str) -> bool {
    graph
        .outgoing(node, view)
        .any(|(_, edge)| edge.properties.is_named(label))
}
