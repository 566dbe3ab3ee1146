//! Code property graph arena
//!
//! Nodes live in a `Vec` addressed by [`NodeId`]; edges live in a second `Vec`
//! addressed by [`EdgeId`]. Every node keeps one outgoing and one incoming
//! list per [`View`], so the overlays never own each other and cycles in the
//! control-flow or data-flow views cost nothing special.
//!
//! Removal tombstones the slot; handles are never reused within one graph.

use crate::shared::models::{Edge, EdgeId, EdgeProperties, Node, NodeId, NodeKind, NodeOffset, View};

use super::error::{GraphError, GraphResult};

#[derive(Debug, Clone, Default)]
struct Adjacency {
    outgoing: [Vec<EdgeId>; View::COUNT],
    incoming: [Vec<EdgeId>; View::COUNT],
}

#[derive(Debug, Clone)]
struct NodeSlot {
    node: Node,
    adjacency: Adjacency,
}

/// Multi-view program graph
#[derive(Debug, Clone, Default)]
pub struct CodePropertyGraph {
    nodes: Vec<Option<NodeSlot>>,
    edges: Vec<Option<Edge>>,
    /// Translation unit roots in insertion order
    units: Vec<NodeId>,
    live_nodes: usize,
    live_edges: usize,
}

impl CodePropertyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Nodes
    // ═══════════════════════════════════════════════════════════════════

    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        if node.kind == NodeKind::TranslationUnit {
            self.units.push(id);
        }
        self.nodes.push(Some(NodeSlot {
            node,
            adjacency: Adjacency::default(),
        }));
        self.live_nodes += 1;
        id
    }

    fn slot(&self, id: NodeId) -> Option<&NodeSlot> {
        self.nodes.get(id.index()).and_then(|slot| slot.as_ref())
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut NodeSlot> {
        self.nodes.get_mut(id.index()).and_then(|slot| slot.as_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slot(id).map(|slot| &slot.node)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slot_mut(id).map(|slot| &mut slot.node)
    }

    /// Like [`node`](Self::node) but reports a missing node as an error
    pub fn try_node(&self, id: NodeId) -> GraphResult<&Node> {
        self.node(id).ok_or(GraphError::UnknownNode(id))
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(|node| node.kind)
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(|node| node.name())
    }

    /// Detach every edge of `id` and tombstone its slot.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        let adjacency = &self.slot(id)?.adjacency;
        let incident: Vec<EdgeId> = adjacency
            .outgoing
            .iter()
            .chain(adjacency.incoming.iter())
            .flatten()
            .copied()
            .collect();
        for edge in incident {
            self.remove_edge(edge);
        }

        let slot = self.nodes.get_mut(id.index())?.take()?;
        self.units.retain(|unit| *unit != id);
        self.live_nodes -= 1;
        Some(slot.node)
    }

    /// Remove `root` and all of its structural descendants. Returns the number
    /// of removed nodes.
    pub fn remove_subtree(&mut self, root: NodeId) -> usize {
        let doomed = self.descendants(root);
        doomed
            .iter()
            .rev()
            .filter(|id| self.remove_node(**id).is_some())
            .count()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Edges
    // ═══════════════════════════════════════════════════════════════════

    /// Attach a directed edge in `view`.
    ///
    /// Both endpoints must exist. In the structural view a node may have at
    /// most one parent.
    pub fn add_edge(
        &mut self,
        view: View,
        source: NodeId,
        target: NodeId,
        properties: EdgeProperties,
    ) -> GraphResult<EdgeId> {
        if !self.contains(source) {
            return Err(GraphError::UnknownNode(source));
        }
        if !self.contains(target) {
            return Err(GraphError::UnknownNode(target));
        }
        if view == View::Ast {
            if let Some(existing) = self.parent(target) {
                return Err(GraphError::StructuralParentConflict {
                    child: target,
                    existing,
                    requested: source,
                });
            }
            self.check_acyclic(source, target)?;
        }

        let id = EdgeId::from_index(self.edges.len());
        self.edges
            .push(Some(Edge::new(view, source, target, properties)));
        if let Some(slot) = self.slot_mut(source) {
            slot.adjacency.outgoing[view.index()].push(id);
        }
        if let Some(slot) = self.slot_mut(target) {
            slot.adjacency.incoming[view.index()].push(id);
        }
        self.live_edges += 1;
        Ok(id)
    }

    /// Append `child` as the last structural child of `parent`
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> GraphResult<EdgeId> {
        let index = self.outgoing_ids(parent, View::Ast).len() as u32;
        self.add_edge(
            View::Ast,
            parent,
            child,
            EdgeProperties::new().with_index(index),
        )
    }

    /// Append `child` under `parent` with a structural role label
    pub fn add_child_with_role(
        &mut self,
        parent: NodeId,
        child: NodeId,
        role: &str,
    ) -> GraphResult<EdgeId> {
        let index = self.outgoing_ids(parent, View::Ast).len() as u32;
        self.add_edge(
            View::Ast,
            parent,
            child,
            EdgeProperties::new().with_index(index).named(role),
        )
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index()).and_then(|edge| edge.as_ref())
    }

    /// Mutable access to the properties of an edge. Endpoints and view are
    /// fixed; use [`retarget_edge`](Self::retarget_edge) to move an edge.
    pub fn edge_properties_mut(&mut self, id: EdgeId) -> Option<&mut EdgeProperties> {
        self.edges
            .get_mut(id.index())
            .and_then(|edge| edge.as_mut())
            .map(|edge| &mut edge.properties)
    }

    /// Detach an edge. Detaching a missing edge is a no-op returning `None`.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.edges.get_mut(id.index())?.take()?;
        let view = edge.view.index();
        if let Some(slot) = self.slot_mut(edge.source) {
            slot.adjacency.outgoing[view].retain(|e| *e != id);
        }
        if let Some(slot) = self.slot_mut(edge.target) {
            slot.adjacency.incoming[view].retain(|e| *e != id);
        }
        self.live_edges -= 1;
        Some(edge)
    }

    /// Detach every `view` edge from `source` to `target`; returns how many
    /// were removed (zero when there were none).
    pub fn remove_edges_between(&mut self, view: View, source: NodeId, target: NodeId) -> usize {
        let doomed: Vec<EdgeId> = self
            .outgoing(source, view)
            .filter(|(_, edge)| edge.target == target)
            .map(|(id, _)| id)
            .collect();
        doomed
            .into_iter()
            .filter(|id| self.remove_edge(*id).is_some())
            .count()
    }

    /// Point an existing edge at a different target, keeping its position in
    /// the source's outgoing list.
    pub fn retarget_edge(&mut self, id: EdgeId, new_target: NodeId) -> GraphResult<()> {
        let edge = self.edge(id).ok_or(GraphError::UnknownEdge(id))?;
        if edge.view == View::Ast {
            return Err(GraphError::StructuralRetarget { edge: id, view: edge.view });
        }
        self.move_edge_target(id, new_target)
    }

    fn move_edge_target(&mut self, id: EdgeId, new_target: NodeId) -> GraphResult<()> {
        if !self.contains(new_target) {
            return Err(GraphError::UnknownNode(new_target));
        }
        let (view, old_target) = {
            let edge = self.edge(id).ok_or(GraphError::UnknownEdge(id))?;
            (edge.view.index(), edge.target)
        };
        if old_target == new_target {
            return Ok(());
        }
        if let Some(slot) = self.slot_mut(old_target) {
            slot.adjacency.incoming[view].retain(|e| *e != id);
        }
        if let Some(slot) = self.slot_mut(new_target) {
            slot.adjacency.incoming[view].push(id);
        }
        if let Some(edge) = self.edges.get_mut(id.index()).and_then(|e| e.as_mut()) {
            edge.target = new_target;
        }
        Ok(())
    }

    /// Put `replacement` at the structural position of `original`.
    ///
    /// `replacement` is detached from its current parent first; `original`
    /// ends up without a parent.
    pub fn replace_child(&mut self, original: NodeId, replacement: NodeId) -> GraphResult<()> {
        if !self.contains(original) {
            return Err(GraphError::UnknownNode(original));
        }
        if !self.contains(replacement) {
            return Err(GraphError::UnknownNode(replacement));
        }
        if let Some(parent) = self.parent(original) {
            self.check_acyclic(parent, replacement)?;
        }
        self.detach_from_parent(replacement);
        let parent_edge = self.incoming_ids(original, View::Ast).first().copied();
        if let Some(edge) = parent_edge {
            self.move_edge_target(edge, replacement)?;
        }
        Ok(())
    }

    /// A structural edge `parent → child` must not close a cycle
    fn check_acyclic(&self, parent: NodeId, child: NodeId) -> GraphResult<()> {
        if parent == child || self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(GraphError::StructuralCycle { parent, child });
        }
        Ok(())
    }

    /// Move `node` (with its subtree) under `new_parent` as the last child
    pub fn reattach(&mut self, node: NodeId, new_parent: NodeId) -> GraphResult<EdgeId> {
        if !self.contains(new_parent) {
            return Err(GraphError::UnknownNode(new_parent));
        }
        self.check_acyclic(new_parent, node)?;
        let role = self.child_role(node).map(str::to_owned);
        self.detach_from_parent(node);
        match role {
            Some(role) => self.add_child_with_role(new_parent, node, &role),
            None => self.add_child(new_parent, node),
        }
    }

    /// Add a `view` edge unless an edge with the same endpoints and label
    /// already exists; returns the existing edge in that case.
    pub fn ensure_edge(
        &mut self,
        view: View,
        source: NodeId,
        target: NodeId,
        properties: EdgeProperties,
    ) -> GraphResult<EdgeId> {
        let existing = self
            .outgoing(source, view)
            .find(|(_, edge)| edge.target == target && edge.properties.name == properties.name)
            .map(|(id, _)| id);
        match existing {
            Some(id) => Ok(id),
            None => self.add_edge(view, source, target, properties),
        }
    }

    /// Move every `view` edge touching `from` over to `to`.
    ///
    /// Incoming edges keep their position in their source's list; outgoing
    /// edges are re-created on `to` in their original order. The structural
    /// view is left alone; use [`replace_child`](Self::replace_child).
    pub fn transfer_edges(&mut self, from: NodeId, to: NodeId, view: View) -> GraphResult<usize> {
        if view == View::Ast {
            return Ok(0);
        }
        if !self.contains(to) {
            return Err(GraphError::UnknownNode(to));
        }
        let incoming: Vec<EdgeId> = self.incoming_ids(from, view).to_vec();
        let outgoing: Vec<EdgeId> = self.outgoing_ids(from, view).to_vec();
        let mut moved = 0;
        for id in incoming {
            self.move_edge_target(id, to)?;
            moved += 1;
        }
        for id in outgoing {
            if let Some(edge) = self.remove_edge(id) {
                let target = if edge.target == from { to } else { edge.target };
                self.add_edge(view, to, target, edge.properties)?;
                moved += 1;
            }
        }
        Ok(moved)
    }

    fn detach_from_parent(&mut self, node: NodeId) {
        let parent_edges: Vec<EdgeId> = self.incoming_ids(node, View::Ast).to_vec();
        for edge in parent_edges {
            self.remove_edge(edge);
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Adjacency queries
    // ═══════════════════════════════════════════════════════════════════

    /// Outgoing edge handles of `node` in `view`, in insertion order
    pub fn outgoing_ids(&self, node: NodeId, view: View) -> &[EdgeId] {
        self.slot(node)
            .map(|slot| slot.adjacency.outgoing[view.index()].as_slice())
            .unwrap_or(&[])
    }

    /// Incoming edge handles of `node` in `view`, in insertion order
    pub fn incoming_ids(&self, node: NodeId, view: View) -> &[EdgeId] {
        self.slot(node)
            .map(|slot| slot.adjacency.incoming[view.index()].as_slice())
            .unwrap_or(&[])
    }

    pub fn outgoing(&self, node: NodeId, view: View) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.outgoing_ids(node, view)
            .iter()
            .filter_map(move |id| self.edge(*id).map(|edge| (*id, edge)))
    }

    pub fn incoming(&self, node: NodeId, view: View) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.incoming_ids(node, view)
            .iter()
            .filter_map(move |id| self.edge(*id).map(|edge| (*id, edge)))
    }

    /// Targets of the outgoing `view` edges of `node`
    pub fn targets(&self, node: NodeId, view: View) -> impl Iterator<Item = NodeId> + '_ {
        self.outgoing(node, view).map(|(_, edge)| edge.target)
    }

    /// Sources of the incoming `view` edges of `node`
    pub fn sources(&self, node: NodeId, view: View) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming(node, view).map(|(_, edge)| edge.source)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Structural helpers
    // ═══════════════════════════════════════════════════════════════════

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.sources(node, View::Ast).next()
    }

    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.targets(node, View::Ast)
    }

    /// Role label of the structural edge leading into `child`
    pub fn child_role(&self, child: NodeId) -> Option<&str> {
        self.incoming(child, View::Ast)
            .next()
            .and_then(|(_, edge)| edge.properties.name.as_deref())
    }

    pub fn child_by_role(&self, node: NodeId, role: &str) -> Option<NodeId> {
        self.outgoing(node, View::Ast)
            .find(|(_, edge)| edge.properties.is_named(role))
            .map(|(_, edge)| edge.target)
    }

    /// Structural ancestors, nearest first (excluding `node`)
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors {
            graph: self,
            current: self.parent(node),
        }
    }

    /// Nearest ancestor whose kind satisfies `predicate`
    pub fn enclosing(&self, node: NodeId, predicate: impl Fn(NodeKind) -> bool) -> Option<NodeId> {
        self.ancestors(node)
            .find(|ancestor| self.kind(*ancestor).map_or(false, &predicate))
    }

    /// Translation unit containing `node` (the node itself if it is a unit)
    pub fn unit_of(&self, node: NodeId) -> Option<NodeId> {
        if self.kind(node) == Some(NodeKind::TranslationUnit) {
            return Some(node);
        }
        self.enclosing(node, |kind| kind == NodeKind::TranslationUnit)
    }

    /// `root` and its structural descendants in pre-order
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        if !self.contains(root) {
            return order;
        }
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            order.push(node);
            let children: Vec<NodeId> = self.children(node).collect();
            stack.extend(children.into_iter().rev());
        }
        order
    }

    // ═══════════════════════════════════════════════════════════════════
    // Whole-graph access
    // ═══════════════════════════════════════════════════════════════════

    pub fn units(&self) -> &[NodeId] {
        &self.units
    }

    pub fn unit_named(&self, name: &str) -> Option<NodeId> {
        self.units
            .iter()
            .copied()
            .find(|unit| self.name(*unit) == Some(name))
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|s| (NodeId::from_index(i), &s.node)))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(i, edge)| edge.as_ref().map(|e| (EdgeId::from_index(i), e)))
    }

    pub fn edges_in(&self, view: View) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges().filter(move |(_, edge)| edge.view == view)
    }

    pub fn node_count(&self) -> usize {
        self.live_nodes
    }

    pub fn edge_count(&self) -> usize {
        self.live_edges
    }

    /// Append a graph built elsewhere (typically on a frontend thread).
    ///
    /// Handles of `other` must be shifted by the returned offset to be valid
    /// in `self`; edge handles are shifted internally.
    pub fn absorb(&mut self, other: CodePropertyGraph) -> NodeOffset {
        let offset = NodeOffset(self.nodes.len() as u32);
        let edge_base = self.edges.len();

        self.nodes.extend(other.nodes.into_iter().map(|slot| {
            slot.map(|mut slot| {
                let adjacency = &mut slot.adjacency;
                for list in adjacency
                    .outgoing
                    .iter_mut()
                    .chain(adjacency.incoming.iter_mut())
                {
                    for edge in list.iter_mut() {
                        *edge = edge.shifted(edge_base);
                    }
                }
                slot
            })
        }));
        self.edges.extend(other.edges.into_iter().map(|edge| {
            edge.map(|mut edge| {
                edge.source = edge.source.offset(offset);
                edge.target = edge.target.offset(offset);
                edge
            })
        }));
        self.units
            .extend(other.units.iter().map(|unit| unit.offset(offset)));
        self.live_nodes += other.live_nodes;
        self.live_edges += other.live_edges;
        offset
    }

    pub fn stats(&self) -> GraphStats {
        let mut edges_per_view = [0usize; View::COUNT];
        for (_, edge) in self.edges() {
            edges_per_view[edge.view.index()] += 1;
        }
        GraphStats {
            nodes: self.live_nodes,
            edges: self.live_edges,
            units: self.units.len(),
            edges_per_view,
        }
    }
}

/// Iterator over structural ancestors
pub struct Ancestors<'g> {
    graph: &'g CodePropertyGraph,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.current?;
        self.current = self.graph.parent(node);
        Some(node)
    }
}

/// Statistics about a graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub units: usize,
    edges_per_view: [usize; View::COUNT],
}

impl GraphStats {
    pub fn edges_in(&self, view: View) -> usize {
        self.edges_per_view[view.index()]
    }
}

impl std::fmt::Display for GraphStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Code Property Graph Statistics:")?;
        writeln!(f, "  Units: {}", self.units)?;
        writeln!(f, "  Nodes: {}", self.nodes)?;
        writeln!(f, "  Edges: {}", self.edges)?;
        for view in View::all() {
            writeln!(f, "    {}: {}", view, self.edges_in(*view))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::NodeKind;

    fn named(graph: &mut CodePropertyGraph, kind: NodeKind, name: &str) -> NodeId {
        graph.add_node(Node::builder(kind).name(name).build())
    }

    #[test]
    fn test_add_and_query_edges() {
        let mut graph = CodePropertyGraph::new();
        let a = named(&mut graph, NodeKind::Reference, "a");
        let b = named(&mut graph, NodeKind::Reference, "b");

        let edge = graph
            .add_edge(View::DataFlow, a, b, EdgeProperties::new())
            .unwrap();

        assert_eq!(graph.targets(a, View::DataFlow).collect::<Vec<_>>(), vec![b]);
        assert_eq!(graph.sources(b, View::DataFlow).collect::<Vec<_>>(), vec![a]);
        assert!(graph.targets(a, View::ControlFlow).next().is_none());
        assert_eq!(graph.edge(edge).unwrap().view, View::DataFlow);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_structural_cycles_are_rejected() {
        let mut graph = CodePropertyGraph::new();
        let unit = named(&mut graph, NodeKind::TranslationUnit, "a.c");
        let func = named(&mut graph, NodeKind::Function, "f");
        let block = graph.add_node(Node::new(NodeKind::Block));
        graph.add_child(unit, func).unwrap();
        graph.add_child(func, block).unwrap();

        assert_eq!(
            graph.add_edge(View::Ast, func, func, EdgeProperties::new()),
            Err(GraphError::StructuralCycle { parent: func, child: func })
        );
        assert_eq!(
            graph.add_child(block, unit),
            Err(GraphError::StructuralCycle { parent: block, child: unit })
        );
        assert_eq!(
            graph.reattach(func, block),
            Err(GraphError::StructuralCycle { parent: block, child: func })
        );
        // Nothing was detached by the rejected moves
        assert_eq!(graph.parent(func), Some(unit));
        assert_eq!(graph.descendants(unit), vec![unit, func, block]);
    }

    #[test]
    fn test_unknown_endpoint_fails_fast() {
        let mut graph = CodePropertyGraph::new();
        let a = named(&mut graph, NodeKind::Reference, "a");
        let ghost = NodeId::from_index(42);

        let err = graph
            .add_edge(View::Call, a, ghost, EdgeProperties::new())
            .unwrap_err();
        assert_eq!(err, GraphError::UnknownNode(ghost));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_remove_missing_edge_is_noop() {
        let mut graph = CodePropertyGraph::new();
        let a = named(&mut graph, NodeKind::Reference, "a");
        let b = named(&mut graph, NodeKind::Reference, "b");
        let edge = graph
            .add_edge(View::DataFlow, a, b, EdgeProperties::new())
            .unwrap();

        assert!(graph.remove_edge(edge).is_some());
        assert!(graph.remove_edge(edge).is_none());
        assert_eq!(graph.remove_edges_between(View::DataFlow, a, b), 0);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_outgoing_order_survives_removal() {
        let mut graph = CodePropertyGraph::new();
        let cond = named(&mut graph, NodeKind::Reference, "c");
        let targets: Vec<NodeId> = (0..4)
            .map(|i| named(&mut graph, NodeKind::Literal, &i.to_string()))
            .collect();
        let edges: Vec<EdgeId> = targets
            .iter()
            .map(|t| {
                graph
                    .add_edge(View::ControlFlow, cond, *t, EdgeProperties::new())
                    .unwrap()
            })
            .collect();

        graph.remove_edge(edges[1]);

        let remaining: Vec<NodeId> = graph.targets(cond, View::ControlFlow).collect();
        assert_eq!(remaining, vec![targets[0], targets[2], targets[3]]);
    }

    #[test]
    fn test_single_structural_parent() {
        let mut graph = CodePropertyGraph::new();
        let unit = named(&mut graph, NodeKind::TranslationUnit, "a.c");
        let other = named(&mut graph, NodeKind::Namespace, "ns");
        let func = named(&mut graph, NodeKind::Function, "f");

        graph.add_child(unit, func).unwrap();
        let err = graph.add_child(other, func).unwrap_err();

        assert!(matches!(
            err,
            GraphError::StructuralParentConflict { child, existing, .. } if child == func && existing == unit
        ));
        assert_eq!(graph.parent(func), Some(unit));
    }

    #[test]
    fn test_remove_node_detaches_edges() {
        let mut graph = CodePropertyGraph::new();
        let unit = named(&mut graph, NodeKind::TranslationUnit, "a.c");
        let field = named(&mut graph, NodeKind::Field, "x");
        let reference = named(&mut graph, NodeKind::Reference, "x");
        graph.add_child(unit, field).unwrap();
        graph
            .add_edge(View::Reference, reference, field, EdgeProperties::new())
            .unwrap();

        let removed = graph.remove_node(field).unwrap();

        assert_eq!(removed.name(), Some("x"));
        assert!(!graph.contains(field));
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.targets(reference, View::Reference).next().is_none());
        assert!(graph.children(unit).next().is_none());
    }

    #[test]
    fn test_retarget_keeps_source_order() {
        let mut graph = CodePropertyGraph::new();
        let call = named(&mut graph, NodeKind::Call, "f");
        let old = named(&mut graph, NodeKind::Function, "f");
        let other = named(&mut graph, NodeKind::Function, "g");
        let new = named(&mut graph, NodeKind::Function, "f");
        let first = graph
            .add_edge(View::Call, call, old, EdgeProperties::new())
            .unwrap();
        graph
            .add_edge(View::Call, call, other, EdgeProperties::new())
            .unwrap();

        graph.retarget_edge(first, new).unwrap();

        assert_eq!(graph.targets(call, View::Call).collect::<Vec<_>>(), vec![new, other]);
        assert!(graph.sources(old, View::Call).next().is_none());
        assert_eq!(graph.sources(new, View::Call).collect::<Vec<_>>(), vec![call]);
    }

    #[test]
    fn test_replace_child_keeps_position() {
        let mut graph = CodePropertyGraph::new();
        let unit = named(&mut graph, NodeKind::TranslationUnit, "a.c");
        let f = named(&mut graph, NodeKind::Function, "f");
        let g = named(&mut graph, NodeKind::Function, "g");
        let g2 = named(&mut graph, NodeKind::Function, "g");
        graph.add_child(unit, f).unwrap();
        graph.add_child(unit, g).unwrap();

        graph.replace_child(f, g2).unwrap();

        assert_eq!(graph.children(unit).collect::<Vec<_>>(), vec![g2, g]);
        assert_eq!(graph.parent(f), None);
    }

    #[test]
    fn test_absorb_rebases_handles() {
        let mut main = CodePropertyGraph::new();
        named(&mut main, NodeKind::TranslationUnit, "a.c");

        let mut fragment = CodePropertyGraph::new();
        let unit = named(&mut fragment, NodeKind::TranslationUnit, "b.c");
        let func = named(&mut fragment, NodeKind::Function, "g");
        fragment.add_child(unit, func).unwrap();

        let offset = main.absorb(fragment);
        let unit = unit.offset(offset);
        let func = func.offset(offset);

        assert_eq!(main.units().len(), 2);
        assert_eq!(main.unit_named("b.c"), Some(unit));
        assert_eq!(main.parent(func), Some(unit));
        assert_eq!(main.node_count(), 3);
        assert_eq!(main.stats().edges_in(View::Ast), 1);
    }

    #[test]
    fn test_descendants_preorder_and_remove_subtree() {
        let mut graph = CodePropertyGraph::new();
        let unit = named(&mut graph, NodeKind::TranslationUnit, "a.c");
        let f = named(&mut graph, NodeKind::Function, "f");
        let p = named(&mut graph, NodeKind::Parameter, "p");
        let g = named(&mut graph, NodeKind::Function, "g");
        graph.add_child(unit, f).unwrap();
        graph.add_child(f, p).unwrap();
        graph.add_child(unit, g).unwrap();

        assert_eq!(graph.descendants(unit), vec![unit, f, p, g]);
        assert_eq!(graph.ancestors(p).collect::<Vec<_>>(), vec![f, unit]);
        assert_eq!(graph.unit_of(p), Some(unit));

        assert_eq!(graph.remove_subtree(f), 2);
        assert_eq!(graph.descendants(unit), vec![unit, g]);
    }

    #[test]
    fn test_transfer_edges_and_ensure_edge() {
        let mut graph = CodePropertyGraph::new();
        let old = named(&mut graph, NodeKind::Field, "x");
        let new = named(&mut graph, NodeKind::Field, "x");
        let read = named(&mut graph, NodeKind::Reference, "x");
        let use_site = named(&mut graph, NodeKind::Reference, "y");
        graph
            .add_edge(View::Reference, read, old, EdgeProperties::new())
            .unwrap();
        graph
            .add_edge(View::DataFlow, old, use_site, EdgeProperties::new())
            .unwrap();

        assert_eq!(graph.transfer_edges(old, new, View::Reference).unwrap(), 1);
        assert_eq!(graph.transfer_edges(old, new, View::DataFlow).unwrap(), 1);

        assert_eq!(graph.targets(read, View::Reference).collect::<Vec<_>>(), vec![new]);
        assert_eq!(graph.targets(new, View::DataFlow).collect::<Vec<_>>(), vec![use_site]);
        assert!(graph.targets(old, View::DataFlow).next().is_none());

        let first = graph
            .ensure_edge(View::DataFlow, new, use_site, EdgeProperties::new())
            .unwrap();
        let again = graph
            .ensure_edge(View::DataFlow, new, use_site, EdgeProperties::new())
            .unwrap();
        assert_eq!(first, again);
        assert_eq!(graph.stats().edges_in(View::DataFlow), 1);
    }
}
