//! Visitor over the structural view
//!
//! Dispatch is a `match` on the closed [`NodeCategory`] set: a visitor
//! overrides the categories it cares about and inspects `node.kind` inside.

use crate::shared::models::{Node, NodeCategory, NodeId};

use super::store::CodePropertyGraph;

pub trait NodeVisitor {
    fn visit_unit(&mut self, graph: &CodePropertyGraph, id: NodeId, node: &Node) {
        let _ = (graph, id, node);
    }

    fn visit_declaration(&mut self, graph: &CodePropertyGraph, id: NodeId, node: &Node) {
        let _ = (graph, id, node);
    }

    fn visit_statement(&mut self, graph: &CodePropertyGraph, id: NodeId, node: &Node) {
        let _ = (graph, id, node);
    }

    fn visit_expression(&mut self, graph: &CodePropertyGraph, id: NodeId, node: &Node) {
        let _ = (graph, id, node);
    }

    fn visit_type(&mut self, graph: &CodePropertyGraph, id: NodeId, node: &Node) {
        let _ = (graph, id, node);
    }

    /// Called before the node and its children are visited
    fn enter_node(&mut self, graph: &CodePropertyGraph, id: NodeId, depth: usize) {
        let _ = (graph, id, depth);
    }

    /// Called after all children were visited
    fn exit_node(&mut self, graph: &CodePropertyGraph, id: NodeId, depth: usize) {
        let _ = (graph, id, depth);
    }
}

/// Route one node to the visit method of its category
pub fn dispatch(visitor: &mut dyn NodeVisitor, graph: &CodePropertyGraph, id: NodeId) {
    let Some(node) = graph.node(id) else {
        return;
    };
    match node.kind.category() {
        NodeCategory::Unit => visitor.visit_unit(graph, id, node),
        NodeCategory::Declaration => visitor.visit_declaration(graph, id, node),
        NodeCategory::Statement => visitor.visit_statement(graph, id, node),
        NodeCategory::Expression => visitor.visit_expression(graph, id, node),
        NodeCategory::Type => visitor.visit_type(graph, id, node),
    }
}

/// Depth-first walk of the structural subtree under `root`
pub fn walk_structure(graph: &CodePropertyGraph, root: NodeId, visitor: &mut dyn NodeVisitor) {
    walk_recursive(graph, root, visitor, 0);
}

fn walk_recursive(
    graph: &CodePropertyGraph,
    id: NodeId,
    visitor: &mut dyn NodeVisitor,
    depth: usize,
) {
    visitor.enter_node(graph, id, depth);
    dispatch(visitor, graph, id);
    for child in graph.children(id) {
        walk_recursive(graph, child, visitor, depth + 1);
    }
    visitor.exit_node(graph, id, depth);
}
