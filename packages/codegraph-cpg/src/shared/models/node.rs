//! Graph vertices
//!
//! A node is a kind tag plus a small set of comparison properties. Edges are
//! not stored on the node itself; the graph keeps per-view adjacency lists
//! keyed by [`NodeId`].

use serde::{Deserialize, Serialize};

use super::span::Span;
use super::type_ref::TypeRef;

/// Opaque, stable handle of a node inside one `CodePropertyGraph` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Re-base a handle from an absorbed fragment.
    pub fn offset(self, by: NodeOffset) -> Self {
        Self(self.0 + by.0)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Amount by which handles of an absorbed graph fragment were shifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeOffset(pub(crate) u32);

impl NodeOffset {
    pub fn zero() -> Self {
        Self(0)
    }
}

/// Coarse grouping of node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeCategory {
    Unit,
    Declaration,
    Statement,
    Expression,
    Type,
}

/// Closed set of node kinds.
///
/// Frontends for every language map their syntax onto these kinds, so passes
/// can match exhaustively instead of probing for the most specific handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    // Unit
    TranslationUnit,

    // Declarations
    Namespace,
    Record,
    Field,
    Function,
    Method,
    Constructor,
    Parameter,
    Variable,
    Typedef,
    Include,

    // Statements
    Block,
    If,
    While,
    For,
    Return,
    Break,
    Continue,
    DeclarationStatement,

    // Expressions
    Call,
    Construct,
    Reference,
    MemberAccess,
    Literal,
    BinaryOperator,
    UnaryOperator,

    // Types
    TypeExpression,
}

impl NodeKind {
    pub fn category(&self) -> NodeCategory {
        match self {
            NodeKind::TranslationUnit => NodeCategory::Unit,
            NodeKind::Namespace
            | NodeKind::Record
            | NodeKind::Field
            | NodeKind::Function
            | NodeKind::Method
            | NodeKind::Constructor
            | NodeKind::Parameter
            | NodeKind::Variable
            | NodeKind::Typedef
            | NodeKind::Include => NodeCategory::Declaration,
            NodeKind::Block
            | NodeKind::If
            | NodeKind::While
            | NodeKind::For
            | NodeKind::Return
            | NodeKind::Break
            | NodeKind::Continue
            | NodeKind::DeclarationStatement => NodeCategory::Statement,
            NodeKind::Call
            | NodeKind::Construct
            | NodeKind::Reference
            | NodeKind::MemberAccess
            | NodeKind::Literal
            | NodeKind::BinaryOperator
            | NodeKind::UnaryOperator => NodeCategory::Expression,
            NodeKind::TypeExpression => NodeCategory::Type,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::TranslationUnit => "translation_unit",
            NodeKind::Namespace => "namespace",
            NodeKind::Record => "record",
            NodeKind::Field => "field",
            NodeKind::Function => "function",
            NodeKind::Method => "method",
            NodeKind::Constructor => "constructor",
            NodeKind::Parameter => "parameter",
            NodeKind::Variable => "variable",
            NodeKind::Typedef => "typedef",
            NodeKind::Include => "include",
            NodeKind::Block => "block",
            NodeKind::If => "if",
            NodeKind::While => "while",
            NodeKind::For => "for",
            NodeKind::Return => "return",
            NodeKind::Break => "break",
            NodeKind::Continue => "continue",
            NodeKind::DeclarationStatement => "declaration_statement",
            NodeKind::Call => "call",
            NodeKind::Construct => "construct",
            NodeKind::Reference => "reference",
            NodeKind::MemberAccess => "member_access",
            NodeKind::Literal => "literal",
            NodeKind::BinaryOperator => "binary_operator",
            NodeKind::UnaryOperator => "unary_operator",
            NodeKind::TypeExpression => "type_expression",
        }
    }

    pub fn is_declaration(&self) -> bool {
        self.category() == NodeCategory::Declaration
    }

    pub fn is_expression(&self) -> bool {
        self.category() == NodeCategory::Expression
    }

    /// Function, method or constructor
    pub fn is_function_like(&self) -> bool {
        matches!(self, NodeKind::Function | NodeKind::Method | NodeKind::Constructor)
    }

    /// Declarations that name a value (anything a reference can resolve to)
    pub fn is_value_declaration(&self) -> bool {
        matches!(
            self,
            NodeKind::Field
                | NodeKind::Function
                | NodeKind::Method
                | NodeKind::Constructor
                | NodeKind::Parameter
                | NodeKind::Variable
                | NodeKind::Typedef
        )
    }

    /// Declarations that introduce a named structure (type or namespace)
    pub fn is_structure_declaration(&self) -> bool {
        matches!(self, NodeKind::Record | NodeKind::Namespace)
    }

    /// Kinds whose children are paired member-by-member during change mapping
    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            NodeKind::TranslationUnit | NodeKind::Namespace | NodeKind::Record
        )
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Node payload stored in the graph arena.
///
/// `name` carries the declared name for declarations, the callee/record name
/// for calls and constructions, and the operator token for operators.
/// `code` is the source text the node was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub name: Option<String>,
    pub code: Option<String>,
    pub span: Option<Span>,
    pub type_ref: TypeRef,
    pub modifiers: Vec<String>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            code: None,
            span: None,
            type_ref: TypeRef::Unknown,
            modifiers: Vec::new(),
        }
    }

    pub fn builder(kind: NodeKind) -> NodeBuilder {
        NodeBuilder { node: Node::new(kind) }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    /// Short human readable label used in logs and error messages
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{} '{}'", self.kind, name),
            None => self.kind.to_string(),
        }
    }
}

/// Fluent construction of [`Node`] values.
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    node: Node,
}

impl NodeBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.node.name = Some(name.into());
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.node.code = Some(code.into());
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.node.span = Some(span);
        self
    }

    pub fn type_ref(mut self, type_ref: TypeRef) -> Self {
        self.node.type_ref = type_ref;
        self
    }

    /// Shorthand for `type_ref(TypeRef::named(..))`
    pub fn typed(self, type_name: impl Into<String>) -> Self {
        self.type_ref(TypeRef::named(type_name))
    }

    pub fn modifier(mut self, modifier: impl Into<String>) -> Self {
        self.node.modifiers.push(modifier.into());
        self
    }

    pub fn build(self) -> Node {
        self.node
    }
}

impl From<NodeBuilder> for Node {
    fn from(builder: NodeBuilder) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_categories() {
        assert_eq!(NodeKind::TranslationUnit.category(), NodeCategory::Unit);
        assert_eq!(NodeKind::Field.category(), NodeCategory::Declaration);
        assert_eq!(NodeKind::While.category(), NodeCategory::Statement);
        assert_eq!(NodeKind::Call.category(), NodeCategory::Expression);
        assert_eq!(NodeKind::TypeExpression.category(), NodeCategory::Type);
    }

    #[test]
    fn test_function_like() {
        assert!(NodeKind::Method.is_function_like());
        assert!(NodeKind::Constructor.is_function_like());
        assert!(!NodeKind::Field.is_function_like());
    }

    #[test]
    fn test_builder() {
        let node: Node = Node::builder(NodeKind::Field)
            .name("balance")
            .typed("int")
            .modifier("private")
            .into();

        assert_eq!(node.name(), Some("balance"));
        assert_eq!(node.type_ref, TypeRef::named("int"));
        assert!(node.has_modifier("private"));
        assert_eq!(node.label(), "field 'balance'");
    }

    #[test]
    fn test_node_id_offset() {
        let id = NodeId::from_index(3);
        assert_eq!(id.offset(NodeOffset(10)).index(), 13);
        assert_eq!(id.to_string(), "n3");
    }
}
