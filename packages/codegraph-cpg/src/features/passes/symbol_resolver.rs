//! Symbol resolution
//!
//! Binds `Reference` and `MemberAccess` expressions to the declarations they
//! name and copies the declared type onto the expression. Plain references go
//! through the scope chain of their position; member accesses look the member
//! up in the record named by the type of their base.

use tracing::{debug, trace};

use super::resolution::{is_resolved, members_named, record_of_type, REFERS_TO};
use super::TypeHierarchyPass;
use crate::features::graph::CodePropertyGraph;
use crate::features::scope::ScopeManager;
use crate::pipeline::{Pass, PassContext, PassDescriptor, PassError, PassId};
use crate::shared::models::{EdgeProperties, NodeId, NodeKind, TypeRef, View};

#[derive(Debug, Clone, Default)]
pub struct SymbolResolverPass {
    unresolved: Vec<NodeId>,
}

impl SymbolResolverPass {
    pub const ID: PassId = PassId::new("symbol-resolver");

    /// Expressions the last run could not bind
    pub fn unresolved(&self) -> &[NodeId] {
        &self.unresolved
    }
}

impl Pass for SymbolResolverPass {
    fn descriptor(&self) -> PassDescriptor {
        PassDescriptor::new(Self::ID).depends_on(TypeHierarchyPass::ID)
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
        self.unresolved.clear();
        // Operands before the expressions using them, so member bases are
        // typed by the time their access is resolved.
        let mut nodes = ctx.target_nodes();
        nodes.reverse();

        let (graph, scopes) = ctx.parts();
        let mut resolved = 0usize;
        for id in nodes {
            let Some(kind) = graph.kind(id) else { continue };
            if !matches!(kind, NodeKind::Reference | NodeKind::MemberAccess) {
                continue;
            }
            if is_resolved(graph, id, View::Reference, REFERS_TO) {
                continue;
            }
            let declaration = match kind {
                NodeKind::Reference => resolve_reference(graph, scopes, id),
                _ => resolve_member(graph, scopes, id),
            };
            match declaration {
                Some(declaration) => {
                    bind(graph, id, declaration)?;
                    resolved += 1;
                }
                None => {
                    trace!(node = %id, "unresolved symbol");
                    self.unresolved.push(id);
                }
            }
        }
        debug!(resolved, unresolved = self.unresolved.len(), "symbols resolved");
        Ok(())
    }
}

fn resolve_reference(graph: &CodePropertyGraph, scopes: &ScopeManager, id: NodeId) -> Option<NodeId> {
    let name = graph.name(id)?;
    let scope = scopes.scope_for_node(graph, id);
    scopes.lookup_from(scope, name)
}

fn resolve_member(graph: &CodePropertyGraph, scopes: &ScopeManager, id: NodeId) -> Option<NodeId> {
    let member = graph.name(id)?;
    let base = graph.children(id).next()?;
    let record = record_of_type(graph, scopes, base)?;
    members_named(graph, record, member).next()
}

fn bind(graph: &mut CodePropertyGraph, id: NodeId, declaration: NodeId) -> Result<(), PassError> {
    graph.ensure_edge(
        View::Reference,
        id,
        declaration,
        EdgeProperties::new().named(REFERS_TO),
    )?;
    let declared = graph
        .node(declaration)
        .filter(|decl| decl.kind.is_value_declaration() || decl.kind == NodeKind::Record)
        .map(|decl| decl.type_ref.clone())
        .unwrap_or(TypeRef::Unknown);
    if let Some(node) = graph.node_mut(id) {
        if node.type_ref.is_unknown() {
            node.type_ref = declared;
        }
    }
    Ok(())
}
