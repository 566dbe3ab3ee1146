//! Record types
//!
//! Gives record declarations, constructors and construct expressions the type
//! named by their record. Runs before any resolution so member lookups on
//! `this`-like receivers can find the record.

use tracing::debug;

use crate::features::graph::{walk_structure, CodePropertyGraph, NodeVisitor};
use crate::pipeline::{Pass, PassContext, PassDescriptor, PassError, PassId};
use crate::shared::models::{Node, NodeId, NodeKind, TypeRef};

#[derive(Debug, Clone, Copy, Default)]
pub struct TypeHierarchyPass;

impl TypeHierarchyPass {
    pub const ID: PassId = PassId::new("type-hierarchy");
}

impl Pass for TypeHierarchyPass {
    fn descriptor(&self) -> PassDescriptor {
        PassDescriptor::new(Self::ID).first()
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
        let mut collector = RecordTypes::default();
        for root in ctx.roots() {
            walk_structure(ctx.graph(), root, &mut collector);
        }

        let graph = ctx.graph_mut();
        let mut typed = 0usize;
        for (id, type_ref) in collector.updates {
            if let Some(node) = graph.node_mut(id) {
                if node.type_ref != type_ref {
                    node.type_ref = type_ref;
                    typed += 1;
                }
            }
        }
        debug!(typed, "record types assigned");
        Ok(())
    }
}

/// Collects the record type of every record, constructor and construct
#[derive(Default)]
struct RecordTypes {
    updates: Vec<(NodeId, TypeRef)>,
}

impl NodeVisitor for RecordTypes {
    fn visit_declaration(&mut self, graph: &CodePropertyGraph, id: NodeId, node: &Node) {
        let type_ref = match node.kind {
            NodeKind::Record => node.name().map(TypeRef::named),
            NodeKind::Constructor => graph
                .enclosing(id, |kind| kind == NodeKind::Record)
                .and_then(|record| graph.name(record))
                .map(TypeRef::named),
            _ => None,
        };
        if let Some(type_ref) = type_ref {
            self.updates.push((id, type_ref));
        }
    }

    fn visit_expression(&mut self, _graph: &CodePropertyGraph, id: NodeId, node: &Node) {
        if node.kind == NodeKind::Construct {
            if let Some(name) = node.name() {
                self.updates.push((id, TypeRef::named(name)));
            }
        }
    }
}
