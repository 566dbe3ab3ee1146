//! Call resolution
//!
//! A call binds to every function of its name that accepts its arguments in
//! the innermost scope holding such a function. Calls with a `receiver` child
//! look among the methods of the receiver's record instead. Construct
//! expressions bind to their record and to the accepting constructors.

use tracing::{debug, trace};

use super::resolution::{
    accepting, is_resolved, members_named, record_of_type, visible_record, INSTANTIATES, INVOKES,
    REFERS_TO,
};
use super::SymbolResolverPass;
use crate::features::graph::CodePropertyGraph;
use crate::features::scope::ScopeManager;
use crate::pipeline::{Pass, PassContext, PassDescriptor, PassError, PassId};
use crate::shared::models::{EdgeProperties, NodeId, NodeKind, TypeRef, View};

#[derive(Debug, Clone, Default)]
pub struct CallResolverPass {
    unresolved: Vec<NodeId>,
}

impl CallResolverPass {
    pub const ID: PassId = PassId::new("call-resolver");

    /// Calls and constructions the last run could not bind
    pub fn unresolved(&self) -> &[NodeId] {
        &self.unresolved
    }
}

impl Pass for CallResolverPass {
    fn descriptor(&self) -> PassDescriptor {
        PassDescriptor::new(Self::ID).depends_on(SymbolResolverPass::ID)
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
        self.unresolved.clear();
        // Nested calls first: an argument's type may come from its callee.
        let mut nodes = ctx.target_nodes();
        nodes.reverse();

        let (graph, scopes) = ctx.parts();
        let mut bound = 0usize;
        for id in nodes {
            let resolved = match graph.kind(id) {
                Some(NodeKind::Call) => resolve_call(graph, scopes, id)?,
                Some(NodeKind::Construct) => resolve_construct(graph, scopes, id)?,
                _ => continue,
            };
            if resolved {
                bound += 1;
            } else {
                trace!(node = %id, "unresolved call");
                self.unresolved.push(id);
            }
        }
        debug!(bound, unresolved = self.unresolved.len(), "calls resolved");
        Ok(())
    }
}

fn resolve_call(
    graph: &mut CodePropertyGraph,
    scopes: &ScopeManager,
    call: NodeId,
) -> Result<bool, PassError> {
    if is_resolved(graph, call, View::Call, INVOKES) {
        return Ok(true);
    }
    let Some(name) = graph.name(call).map(str::to_owned) else {
        return Ok(false);
    };

    let receiver = graph.child_by_role(call, "receiver");
    let callees = match receiver {
        Some(receiver) => match record_of_type(graph, scopes, receiver) {
            Some(record) => {
                let methods: Vec<NodeId> = members_named(graph, record, &name).collect();
                accepting(graph, call, methods)
            }
            None => Vec::new(),
        },
        None => {
            let scope = scopes.scope_for_node(graph, call);
            scopes
                .chain(scope)
                .map(|s| accepting(graph, call, s.lookup_local_all(&name).iter().copied()))
                .find(|found| !found.is_empty())
                .unwrap_or_default()
        }
    };

    for callee in &callees {
        graph.ensure_edge(View::Call, call, *callee, EdgeProperties::new().named(INVOKES))?;
    }
    // The return type is only known when the binding is unambiguous
    if let [callee] = callees.as_slice() {
        let returns = graph.node(*callee).map(|f| f.type_ref.clone()).unwrap_or(TypeRef::Unknown);
        if let Some(node) = graph.node_mut(call) {
            if node.type_ref.is_unknown() {
                node.type_ref = returns;
            }
        }
    }
    Ok(!callees.is_empty())
}

fn resolve_construct(
    graph: &mut CodePropertyGraph,
    scopes: &ScopeManager,
    construct: NodeId,
) -> Result<bool, PassError> {
    let Some(name) = graph.name(construct).map(str::to_owned) else {
        return Ok(false);
    };
    let Some(record) = visible_record(graph, scopes, construct, &name) else {
        return Ok(false);
    };
    graph.ensure_edge(
        View::Reference,
        construct,
        record,
        EdgeProperties::new().named(REFERS_TO),
    )?;
    graph.ensure_edge(
        View::Call,
        construct,
        record,
        EdgeProperties::new().named(INSTANTIATES),
    )?;

    let constructors: Vec<NodeId> = graph
        .children(record)
        .filter(|member| graph.kind(*member) == Some(NodeKind::Constructor))
        .collect();
    for constructor in accepting(graph, construct, constructors) {
        graph.ensure_edge(
            View::Call,
            construct,
            constructor,
            EdgeProperties::new().named(INVOKES),
        )?;
    }
    Ok(true)
}
