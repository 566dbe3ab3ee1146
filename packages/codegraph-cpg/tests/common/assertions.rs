//! Custom assertions for graph verification

use codegraph_cpg::shared::models::{NodeId, NodeKind, View};
use codegraph_cpg::CodePropertyGraph;

/// The only node of `kind` named `name`
pub fn find(graph: &CodePropertyGraph, kind: NodeKind, name: &str) -> NodeId {
    let found: Vec<NodeId> = graph
        .nodes()
        .filter(|(_, node)| node.kind == kind && node.name() == Some(name))
        .map(|(id, _)| id)
        .collect();
    assert_eq!(
        found.len(),
        1,
        "Expected exactly one {kind} '{name}', found {}",
        found.len()
    );
    found[0]
}

/// Targets of `node`'s edges in `view` labelled `label`
pub fn labelled_targets(
    graph: &CodePropertyGraph,
    node: NodeId,
    view: View,
    label: &str,
) -> Vec<NodeId> {
    graph
        .outgoing(node, view)
        .filter(|(_, edge)| edge.properties.is_named(label))
        .map(|(_, edge)| edge.target)
        .collect()
}

/// Assert that every reference below `root` resolved to a declaration
pub fn assert_references_resolved(graph: &CodePropertyGraph, root: NodeId) {
    for id in graph.descendants(root) {
        if graph.kind(id) == Some(NodeKind::Reference) {
            assert!(
                !labelled_targets(graph, id, View::Reference, "refers_to").is_empty(),
                "Reference '{}' ({id}) is unresolved",
                graph.name(id).unwrap_or_default()
            );
        }
    }
}

/// Assert that no edge of any view touches a removed node
pub fn assert_no_dangling_edges(graph: &CodePropertyGraph) {
    for (id, edge) in graph.edges() {
        assert!(
            graph.contains(edge.source) && graph.contains(edge.target),
            "Edge {id:?} in {:?} dangles: {} -> {}",
            edge.view,
            edge.source,
            edge.target
        );
    }
}
