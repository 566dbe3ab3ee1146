//! Comparison keys
//!
//! Two nodes match when their keys are equal. Keys only use properties that
//! frontends produce; anything a pass writes (resolved types of expressions,
//! edges) is left out so an enriched snapshot still matches a fresh one.

use crate::features::graph::CodePropertyGraph;
use crate::shared::models::{NodeId, NodeKind, TypeRef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonKey {
    kind: NodeKind,
    name: Option<String>,
    type_ref: Option<TypeRef>,
    modifiers: Vec<String>,
    signature: Vec<TypeRef>,
    code: Option<String>,
    body: Option<blake3::Hash>,
}

impl ComparisonKey {
    pub fn of(graph: &CodePropertyGraph, id: NodeId) -> Option<Self> {
        let node = graph.node(id)?;
        let mut key = Self {
            kind: node.kind,
            name: node.name.clone(),
            type_ref: None,
            modifiers: node.modifiers.clone(),
            signature: Vec::new(),
            code: None,
            body: None,
        };
        match node.kind {
            // Members are compared one by one when the composite matched
            NodeKind::TranslationUnit | NodeKind::Namespace | NodeKind::Record => {}
            NodeKind::Field => key.type_ref = Some(node.type_ref.clone()),
            kind if kind.is_function_like() => {
                key.signature = signature(graph, id);
                key.body = Some(body_hash(graph, id, |child| {
                    graph.kind(child) != Some(NodeKind::Parameter)
                }));
            }
            _ => {
                key.type_ref = Some(node.type_ref.clone());
                key.code = node.code.clone();
                key.body = Some(body_hash(graph, id, |_| true));
            }
        }
        Some(key)
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether an unmatched `self` and `other` are two versions of the same
    /// member: same kind and name, and for fields the same type.
    pub fn is_replacement_of(&self, other: &ComparisonKey) -> bool {
        if self.kind != other.kind || self.name != other.name {
            return false;
        }
        self.kind != NodeKind::Field || self.type_ref == other.type_ref
    }

    pub fn signature(&self) -> &[TypeRef] {
        &self.signature
    }
}

/// Members whose removal or addition is a localized change
pub fn is_localized_member(kind: NodeKind) -> bool {
    kind == NodeKind::Field || kind.is_function_like()
}

/// Parameter types of a function-like node, in declaration order
pub fn signature(graph: &CodePropertyGraph, function: NodeId) -> Vec<TypeRef> {
    graph
        .children(function)
        .filter_map(|child| graph.node(child))
        .filter(|node| node.kind == NodeKind::Parameter)
        .map(|node| node.type_ref.clone())
        .collect()
}

/// Argument types of a call or construct expression. A child with the role
/// "receiver" is the object a method is invoked on and not an argument.
pub fn argument_types(graph: &CodePropertyGraph, call: NodeId) -> Vec<TypeRef> {
    graph
        .children(call)
        .filter(|arg| graph.child_role(*arg) != Some("receiver"))
        .filter_map(|arg| graph.node(arg))
        .map(|node| node.type_ref.clone())
        .collect()
}

/// Whether a call with `arguments` can still bind to `parameters`
pub fn signature_accepts(parameters: &[TypeRef], arguments: &[TypeRef]) -> bool {
    parameters.len() == arguments.len()
        && parameters
            .iter()
            .zip(arguments)
            .all(|(param, arg)| param.accepts(arg))
}

/// Hash of the frontend-visible shape of the subtrees under the children of
/// `root` selected by `include`
fn body_hash(
    graph: &CodePropertyGraph,
    root: NodeId,
    include: impl Fn(NodeId) -> bool,
) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    for child in graph.children(root).filter(|c| include(*c)) {
        for node_id in graph.descendants(child) {
            let Some(node) = graph.node(node_id) else {
                continue;
            };
            hasher.update(node.kind.as_str().as_bytes());
            hasher.update(&[0]);
            if let Some(role) = graph.child_role(node_id) {
                hasher.update(role.as_bytes());
            }
            hasher.update(&[0]);
            if let Some(name) = node.name() {
                hasher.update(name.as_bytes());
            }
            hasher.update(&[0]);
            if let Some(code) = node.code() {
                hasher.update(code.as_bytes());
            }
            hasher.update(&[0]);
            let children = graph.children(node_id).count() as u64;
            hasher.update(&children.to_le_bytes());
        }
    }
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::Node;

    fn function(graph: &mut CodePropertyGraph, param_type: &str, literal: &str) -> NodeId {
        let f = graph.add_node(Node::builder(NodeKind::Function).name("f").build());
        let p = graph.add_node(Node::builder(NodeKind::Parameter).name("a").typed(param_type).build());
        let body = graph.add_node(Node::new(NodeKind::Block));
        let ret = graph.add_node(Node::new(NodeKind::Return));
        let lit = graph.add_node(Node::builder(NodeKind::Literal).code(literal).build());
        graph.add_child(f, p).unwrap();
        graph.add_child(f, body).unwrap();
        graph.add_child(body, ret).unwrap();
        graph.add_child(ret, lit).unwrap();
        f
    }

    #[test]
    fn test_function_key_covers_signature_and_body() {
        let mut graph = CodePropertyGraph::new();
        let a = function(&mut graph, "int", "1");
        let same = function(&mut graph, "int", "1");
        let body = function(&mut graph, "int", "2");
        let sig = function(&mut graph, "long", "1");

        let key = |id| ComparisonKey::of(&graph, id).unwrap();
        assert_eq!(key(a), key(same));
        assert_ne!(key(a), key(body));
        assert_ne!(key(a), key(sig));
        assert!(key(body).is_replacement_of(&key(a)));
        assert!(key(sig).is_replacement_of(&key(a)));
    }

    #[test]
    fn test_resolved_expression_types_do_not_change_keys() {
        let mut graph = CodePropertyGraph::new();
        let a = function(&mut graph, "int", "1");
        let b = function(&mut graph, "int", "1");
        let literal = graph.descendants(b).last().copied().unwrap();
        graph.node_mut(literal).unwrap().type_ref = TypeRef::named("int");

        assert_eq!(ComparisonKey::of(&graph, a), ComparisonKey::of(&graph, b));
    }

    #[test]
    fn test_field_replacement_needs_same_type() {
        let mut graph = CodePropertyGraph::new();
        let x_int = graph.add_node(Node::builder(NodeKind::Field).name("x").typed("int").build());
        let x_int_const = graph.add_node(
            Node::builder(NodeKind::Field).name("x").typed("int").modifier("const").build(),
        );
        let x_long = graph.add_node(Node::builder(NodeKind::Field).name("x").typed("long").build());

        let key = |id| ComparisonKey::of(&graph, id).unwrap();
        assert_ne!(key(x_int), key(x_int_const));
        assert!(key(x_int_const).is_replacement_of(&key(x_int)));
        assert!(!key(x_long).is_replacement_of(&key(x_int)));
    }

    #[test]
    fn test_signature_accepts() {
        let int = TypeRef::named("int");
        assert!(signature_accepts(&[int.clone()], &[TypeRef::Unknown]));
        assert!(!signature_accepts(&[int.clone()], &[int.clone(), int.clone()]));
        assert!(!signature_accepts(&[int], &[TypeRef::named("char*")]));
    }
}
