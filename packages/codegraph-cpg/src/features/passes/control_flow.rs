//! Evaluation order graph
//!
//! Builds `ControlFlow` edges for every function-like node, starting at the
//! function itself. Operands are evaluated before the expression using them;
//! statements follow each other in block order. `if`/`while`/`for` nodes are
//! placed after their condition and split with `branch = true/false`. Loop
//! bodies link back to the first node of the condition. A `return` keeps its
//! fall-through edge so dead code stays connected for later passes.

use tracing::debug;

use super::SymbolResolverPass;
use crate::features::graph::CodePropertyGraph;
use crate::pipeline::{Pass, PassContext, PassDescriptor, PassError, PassId};
use crate::shared::models::{EdgeProperties, NodeId, NodeKind, View};

#[derive(Debug, Clone, Copy, Default)]
pub struct ControlFlowPass;

impl ControlFlowPass {
    pub const ID: PassId = PassId::new("control-flow");
}

impl Pass for ControlFlowPass {
    fn descriptor(&self) -> PassDescriptor {
        PassDescriptor::new(Self::ID).soft_depends_on(SymbolResolverPass::ID)
    }

    fn run(&mut self, ctx: &mut PassContext<'_>) -> Result<(), PassError> {
        let functions: Vec<NodeId> = ctx
            .target_nodes()
            .into_iter()
            .filter(|id| ctx.graph().kind(*id).map_or(false, |k| k.is_function_like()))
            .collect();

        let graph = ctx.graph_mut();
        let mut built = 0usize;
        for function in functions {
            // Already built by an earlier run
            if graph.outgoing(function, View::ControlFlow).next().is_some() {
                continue;
            }
            FlowBuilder::new(graph).build(function)?;
            built += 1;
        }
        debug!(functions = built, "evaluation order built");
        Ok(())
    }
}

/// Pending edge source: a node and the branch its edge stands for
type Exit = (NodeId, Option<bool>);

#[derive(Default)]
struct LoopFrame {
    breaks: Vec<NodeId>,
    continues: Vec<NodeId>,
}

struct FlowBuilder<'g> {
    graph: &'g mut CodePropertyGraph,
    /// Nodes in the order they were placed
    order: Vec<NodeId>,
    loops: Vec<LoopFrame>,
}

impl<'g> FlowBuilder<'g> {
    fn new(graph: &'g mut CodePropertyGraph) -> Self {
        Self {
            graph,
            order: Vec::new(),
            loops: Vec::new(),
        }
    }

    fn build(mut self, function: NodeId) -> Result<(), PassError> {
        let mut exits = vec![(function, None)];
        let body: Vec<NodeId> = self
            .graph
            .children(function)
            .filter(|child| self.graph.kind(*child) != Some(NodeKind::Parameter))
            .collect();
        for child in body {
            exits = self.visit(child, exits)?;
        }
        Ok(())
    }

    fn link(&mut self, exits: &[Exit], target: NodeId) -> Result<(), PassError> {
        for (source, branch) in exits {
            let properties = match branch {
                Some(branch) => EdgeProperties::new().with_branch(*branch),
                None => EdgeProperties::new(),
            };
            self.graph.add_edge(View::ControlFlow, *source, target, properties)?;
        }
        Ok(())
    }

    fn place(&mut self, exits: &[Exit], node: NodeId) -> Result<Vec<Exit>, PassError> {
        self.link(exits, node)?;
        self.order.push(node);
        Ok(vec![(node, None)])
    }

    /// First node placed since `mark`
    fn entry_since(&self, mark: usize) -> Option<NodeId> {
        self.order.get(mark).copied()
    }

    fn role(&self, node: NodeId, role: &str) -> Option<NodeId> {
        self.graph.child_by_role(node, role)
    }

    fn visit_opt(&mut self, node: Option<NodeId>, exits: Vec<Exit>) -> Result<Vec<Exit>, PassError> {
        match node {
            Some(node) => self.visit(node, exits),
            None => Ok(exits),
        }
    }

    fn visit(&mut self, node: NodeId, exits: Vec<Exit>) -> Result<Vec<Exit>, PassError> {
        let Some(kind) = self.graph.kind(node) else {
            return Ok(exits);
        };
        match kind {
            NodeKind::Block => {
                let mut exits = exits;
                let children: Vec<NodeId> = self.graph.children(node).collect();
                for child in children {
                    exits = self.visit(child, exits)?;
                }
                Ok(exits)
            }
            NodeKind::If => self.visit_if(node, exits),
            NodeKind::While => self.visit_while(node, exits),
            NodeKind::For => self.visit_for(node, exits),
            NodeKind::Break | NodeKind::Continue => {
                self.place(&exits, node)?;
                if let Some(frame) = self.loops.last_mut() {
                    match kind {
                        NodeKind::Break => frame.breaks.push(node),
                        _ => frame.continues.push(node),
                    }
                }
                Ok(Vec::new())
            }
            // Nested declarations have their own flow or none at all
            NodeKind::Record | NodeKind::Namespace | NodeKind::Function | NodeKind::Method
            | NodeKind::Constructor | NodeKind::Typedef | NodeKind::Include => Ok(exits),
            _ => {
                let mut exits = exits;
                let operands: Vec<NodeId> = self.graph.children(node).collect();
                for operand in operands {
                    exits = self.visit(operand, exits)?;
                }
                self.place(&exits, node)
            }
        }
    }

    fn visit_if(&mut self, node: NodeId, exits: Vec<Exit>) -> Result<Vec<Exit>, PassError> {
        let condition = self.role(node, "condition");
        let then_branch = self.role(node, "then");
        let else_branch = self.role(node, "else");

        let exits = self.visit_opt(condition, exits)?;
        self.place(&exits, node)?;

        let mut out = self.visit_opt(then_branch, vec![(node, Some(true))])?;
        out.extend(self.visit_opt(else_branch, vec![(node, Some(false))])?);
        Ok(out)
    }

    fn visit_while(&mut self, node: NodeId, exits: Vec<Exit>) -> Result<Vec<Exit>, PassError> {
        let condition = self.role(node, "condition");
        let body = self.role(node, "body");

        let mark = self.order.len();
        let exits = self.visit_opt(condition, exits)?;
        self.place(&exits, node)?;
        let header = self.entry_since(mark).unwrap_or(node);

        self.loops.push(LoopFrame::default());
        let mut back = self.visit_opt(body, vec![(node, Some(true))])?;
        let frame = self.loops.pop().unwrap_or_default();
        back.extend(frame.continues.into_iter().map(|c| (c, None)));
        self.link(&back, header)?;

        let mut out = vec![(node, Some(false))];
        out.extend(frame.breaks.into_iter().map(|b| (b, None)));
        Ok(out)
    }

    fn visit_for(&mut self, node: NodeId, exits: Vec<Exit>) -> Result<Vec<Exit>, PassError> {
        let initializer = self.role(node, "initializer");
        let condition = self.role(node, "condition");
        let iteration = self.role(node, "iteration");
        let body = self.role(node, "body");

        let exits = self.visit_opt(initializer, exits)?;
        let mark = self.order.len();
        let exits = self.visit_opt(condition, exits)?;
        self.place(&exits, node)?;
        let header = self.entry_since(mark).unwrap_or(node);

        self.loops.push(LoopFrame::default());
        let mut next = self.visit_opt(body, vec![(node, Some(true))])?;
        let frame = self.loops.pop().unwrap_or_default();
        next.extend(frame.continues.into_iter().map(|c| (c, None)));
        let back = self.visit_opt(iteration, next)?;
        self.link(&back, header)?;

        let mut out = vec![(node, Some(false))];
        out.extend(frame.breaks.into_iter().map(|b| (b, None)));
        Ok(out)
    }
}
