//! Per-unit graph construction
//!
//! A frontend drives one [`UnitBuilder`] per translation unit: `open` a node
//! to descend into it, `add` leaves, `close` to come back up. Declarations
//! are registered with the scope stack as they are added, and nodes that own
//! a lexical scope enter it on `open` and leave it on `close`.

use tracing::debug;

use crate::features::graph::{CodePropertyGraph, GraphError};
use crate::features::scope::{ScopeKind, ScopeManager};
use crate::shared::models::{Node, NodeId, NodeKind};
use crate::shared::ports::FrontendError;

#[derive(Debug, Clone, Copy)]
struct OpenNode {
    node: NodeId,
    scoped: bool,
}

#[derive(Debug)]
pub struct UnitBuilder {
    name: String,
    graph: CodePropertyGraph,
    scopes: ScopeManager,
    root: NodeId,
    stack: Vec<OpenNode>,
}

impl UnitBuilder {
    pub fn new(name: &str) -> Self {
        let mut graph = CodePropertyGraph::new();
        let root = graph.add_node(Node::builder(NodeKind::TranslationUnit).name(name).build());
        Self {
            name: name.to_string(),
            graph,
            scopes: ScopeManager::for_unit(root),
            root,
            stack: vec![OpenNode {
                node: root,
                scoped: false,
            }],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit(&self) -> NodeId {
        self.root
    }

    pub fn graph(&self) -> &CodePropertyGraph {
        &self.graph
    }

    /// Direct graph access for edges the builder does not model
    pub fn graph_mut(&mut self) -> &mut CodePropertyGraph {
        &mut self.graph
    }

    pub fn scopes(&self) -> &ScopeManager {
        &self.scopes
    }

    /// Innermost open node
    pub fn parent(&self) -> NodeId {
        self.stack.last().map(|open| open.node).unwrap_or(self.root)
    }

    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Add a leaf under the innermost open node
    pub fn add(&mut self, node: impl Into<Node>) -> Result<NodeId, FrontendError> {
        self.attach(node.into(), None)
    }

    /// Add a leaf with a structural role ("condition", "then", ...)
    pub fn add_as(&mut self, role: &str, node: impl Into<Node>) -> Result<NodeId, FrontendError> {
        self.attach(node.into(), Some(role))
    }

    /// Add a node and descend into it
    pub fn open(&mut self, node: impl Into<Node>) -> Result<NodeId, FrontendError> {
        let id = self.attach(node.into(), None)?;
        self.push(id)?;
        Ok(id)
    }

    pub fn open_as(&mut self, role: &str, node: impl Into<Node>) -> Result<NodeId, FrontendError> {
        let id = self.attach(node.into(), Some(role))?;
        self.push(id)?;
        Ok(id)
    }

    /// Leave `node`, which must be the innermost open node
    pub fn close(&mut self, node: NodeId) -> Result<(), FrontendError> {
        let top = match self.stack.last() {
            Some(open) if self.stack.len() > 1 => *open,
            _ => {
                return Err(GraphError::UnbalancedStructure {
                    expected: None,
                    found: node,
                }
                .into())
            }
        };
        if top.node != node {
            return Err(GraphError::UnbalancedStructure {
                expected: Some(top.node),
                found: node,
            }
            .into());
        }
        if top.scoped {
            self.scopes.leave(node)?;
        }
        self.stack.pop();
        Ok(())
    }

    /// `open` a node, run `body` inside it, then `close` it
    pub fn within<F>(&mut self, node: impl Into<Node>, body: F) -> Result<NodeId, FrontendError>
    where
        F: FnOnce(&mut Self) -> Result<(), FrontendError>,
    {
        let id = self.open(node)?;
        body(self)?;
        self.close(id)?;
        Ok(id)
    }

    /// Like [`within`](Self::within) with a structural role
    pub fn within_as<F>(
        &mut self,
        role: &str,
        node: impl Into<Node>,
        body: F,
    ) -> Result<NodeId, FrontendError>
    where
        F: FnOnce(&mut Self) -> Result<(), FrontendError>,
    {
        let id = self.open_as(role, node)?;
        body(self)?;
        self.close(id)?;
        Ok(id)
    }

    fn attach(&mut self, node: Node, role: Option<&str>) -> Result<NodeId, FrontendError> {
        let parent = self.parent();
        let declaration = node.kind.is_declaration();
        let id = self.graph.add_node(node);
        match role {
            Some(role) => self.graph.add_child_with_role(parent, id, role)?,
            None => self.graph.add_child(parent, id)?,
        };
        if declaration {
            self.scopes.add_declaration(&mut self.graph, id)?;
        }
        Ok(id)
    }

    fn push(&mut self, id: NodeId) -> Result<(), FrontendError> {
        let scoped = match self.graph.kind(id) {
            Some(kind) => ScopeKind::for_owner(kind).is_some(),
            None => false,
        };
        if scoped {
            self.scopes.enter(&self.graph, id)?;
        }
        self.stack.push(OpenNode { node: id, scoped });
        Ok(())
    }

    /// Finish construction; every opened node must have been closed.
    pub fn finish(self) -> Result<UnitFragment, FrontendError> {
        if let Some(open) = self.stack.last().filter(|_| self.stack.len() > 1) {
            return Err(GraphError::UnbalancedStructure {
                expected: Some(open.node),
                found: self.root,
            }
            .into());
        }
        debug!(
            unit = %self.name,
            nodes = self.graph.node_count(),
            scopes = self.scopes.len(),
            "unit constructed"
        );
        Ok(UnitFragment {
            name: self.name,
            graph: self.graph,
            scopes: self.scopes,
            root: self.root,
        })
    }
}

/// Output of one frontend run: a graph fragment and its scope tree
#[derive(Debug)]
pub struct UnitFragment {
    pub name: String,
    pub graph: CodePropertyGraph,
    pub scopes: ScopeManager,
    pub root: NodeId,
}
