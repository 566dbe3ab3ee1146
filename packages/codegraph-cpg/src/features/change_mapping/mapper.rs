//! Change mapper
//!
//! Planning walks every (original, changed) unit pair depth-first and decides
//! per member whether it matched, was replaced, added or removed. Nothing is
//! mutated until every unit matched; only then are the replacements grafted
//! into the original graph and the call/reference edges patched.
//!
//! Every expression whose binding a patch touches is reported dirty so the
//! passes can redo its neighbourhood. An added member that could capture a
//! use which is already bound aborts the diff instead.

use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use super::comparison::{
    argument_types, is_localized_member, signature, signature_accepts, ComparisonKey,
};
use super::report::ChangeReport;
use super::work_item::{AbortReason, ChangePlan, PatchOp, UnitPlan, WorkItem};
use crate::features::graph::{CodePropertyGraph, GraphResult};
use crate::features::passes::resolution::{INSTANTIATES, INVOKES, REFERS_TO};
use crate::shared::models::{EdgeId, NodeId, NodeKind, NodeOffset, TypeRef, View};

/// Outcome of [`ChangeMapper::diff`]
#[derive(Debug)]
pub enum DiffOutcome {
    /// The original graph was patched in place; only `report.dirty` needs
    /// enrichment.
    Reused(ChangeReport),
    /// Full re-analysis needed; the original graph is untouched and the
    /// changed snapshot is handed back.
    Reanalyze {
        report: ChangeReport,
        changed: CodePropertyGraph,
    },
}

impl DiffOutcome {
    pub fn reanalysis_needed(&self) -> bool {
        matches!(self, DiffOutcome::Reanalyze { .. })
    }

    pub fn report(&self) -> &ChangeReport {
        match self {
            DiffOutcome::Reused(report) => report,
            DiffOutcome::Reanalyze { report, .. } => report,
        }
    }
}

pub struct ChangeMapper;

impl ChangeMapper {
    /// Diff `changed` against `original` and patch `original` when possible
    pub fn diff(
        original: &mut CodePropertyGraph,
        changed: CodePropertyGraph,
    ) -> GraphResult<DiffOutcome> {
        let plan = Self::plan(original, &changed);
        if !plan.is_reusable() {
            let report = ChangeReport::from_plan(&plan);
            for aborted in &report.aborted {
                warn!(unit = %aborted.unit, node = %aborted.node, reason = %aborted.reason, "diff aborted");
            }
            return Ok(DiffOutcome::Reanalyze { report, changed });
        }
        let report = Self::apply(original, changed, &plan)?;
        info!(
            replaced = report.replaced(),
            added = report.added(),
            removed = report.removed(),
            dirty = report.dirty.len(),
            "incremental patch applied"
        );
        Ok(DiffOutcome::Reused(report))
    }

    /// Read-only comparison of all units of both snapshots
    pub fn plan(original: &CodePropertyGraph, changed: &CodePropertyGraph) -> ChangePlan {
        let mut plan = ChangePlan::default();
        let mut paired: FxHashSet<NodeId> = FxHashSet::default();

        for &original_root in original.units() {
            let name = original.name(original_root).unwrap_or_default().to_string();
            let partner = changed
                .units()
                .iter()
                .copied()
                .find(|c| !paired.contains(c) && changed.name(*c) == Some(name.as_str()));
            match partner {
                Some(changed_root) => {
                    paired.insert(changed_root);
                    plan.units.push(plan_unit(
                        original,
                        changed,
                        name,
                        WorkItem::new(original_root, changed_root),
                    ));
                }
                None => {
                    let mut unit = UnitPlan::new(name);
                    unit.abort(original_root, AbortReason::UnpairedUnit);
                    plan.units.push(unit);
                }
            }
        }
        for &changed_root in changed.units() {
            if !paired.contains(&changed_root) {
                let mut unit = UnitPlan::new(changed.name(changed_root).unwrap_or_default());
                unit.abort(changed_root, AbortReason::UnpairedUnit);
                plan.units.push(unit);
            }
        }
        plan
    }

    /// Graft `changed` into `original` according to a fully reusable plan
    pub fn apply(
        original: &mut CodePropertyGraph,
        changed: CodePropertyGraph,
        plan: &ChangePlan,
    ) -> GraphResult<ChangeReport> {
        let changed_roots: Vec<NodeId> = changed.units().to_vec();
        let offset = original.absorb(changed);
        let mut patcher = Patcher {
            graph: original,
            offset,
            report: ChangeReport::from_plan(plan),
            dirty: FxHashSet::default(),
        };

        for unit in &plan.units {
            for op in &unit.ops {
                debug!(unit = %unit.name, ?op, "applying patch");
                patcher.apply(op)?;
            }
            for root in &unit.rebind {
                patcher.mark_dirty(*root);
            }
        }

        for root in changed_roots {
            patcher.graph.remove_subtree(root.offset(offset));
        }
        let mut report = patcher.report;
        report.dirty.retain(|node| original.contains(*node));
        Ok(report)
    }
}

fn plan_unit(
    original: &CodePropertyGraph,
    changed: &CodePropertyGraph,
    name: String,
    roots: WorkItem,
) -> UnitPlan {
    let mut plan = UnitPlan::new(name);
    if ComparisonKey::of(original, roots.original) != ComparisonKey::of(changed, roots.changed) {
        plan.abort(roots.original, AbortReason::RootMismatch);
        return plan;
    }

    let mut stack = vec![roots];
    let mut seen_original: FxHashSet<NodeId> = FxHashSet::default();
    let mut seen_changed: FxHashSet<NodeId> = FxHashSet::default();

    while let Some(item) = stack.pop() {
        if !seen_original.insert(item.original) || !seen_changed.insert(item.changed) {
            continue;
        }
        plan.matched += 1;

        let composite = original
            .kind(item.original)
            .map_or(false, |kind| kind.is_composite());
        if composite {
            let pairs = pair_children(original, changed, item, &seen_changed, &mut plan);
            stack.extend(pairs.into_iter().rev());
        }
    }
    plan
}

/// Greedy pairing of the children of a matched composite.
///
/// Returns the matched pairs; unmatched members become patch operations or
/// abort the subtree.
fn pair_children(
    original: &CodePropertyGraph,
    changed: &CodePropertyGraph,
    parent: WorkItem,
    seen_changed: &FxHashSet<NodeId>,
    plan: &mut UnitPlan,
) -> Vec<WorkItem> {
    let changed_children: Vec<(NodeId, Option<ComparisonKey>)> = changed
        .children(parent.changed)
        .map(|c| (c, ComparisonKey::of(changed, c)))
        .collect();
    let mut used = vec![false; changed_children.len()];
    let mut pairs = Vec::new();
    let mut removed: Vec<(NodeId, Option<ComparisonKey>)> = Vec::new();

    for child in original.children(parent.original) {
        let key = ComparisonKey::of(original, child);
        let partner = changed_children.iter().enumerate().find_map(|(i, (c, k))| {
            (!used[i] && !seen_changed.contains(c) && key.is_some() && *k == key).then_some(i)
        });
        match partner {
            Some(i) => {
                used[i] = true;
                pairs.push(WorkItem::new(child, changed_children[i].0));
            }
            None => removed.push((child, key)),
        }
    }
    let mut added: Vec<(NodeId, Option<ComparisonKey>)> = changed_children
        .into_iter()
        .zip(used)
        .filter(|(_, used)| !used)
        .map(|(child, _)| child)
        .collect();

    let mut localized = true;
    for (graph, members) in [(original, &removed), (changed, &added)] {
        for (node, key) in members {
            if key.as_ref().map_or(false, |k| is_localized_member(k.kind())) {
                continue;
            }
            localized = false;
            let kind = graph.kind(*node).unwrap_or(NodeKind::Block);
            let name = graph.name(*node).map(str::to_owned);
            plan.abort(*node, AbortReason::UnmatchedChild { kind, name });
        }
    }
    if !localized {
        return pairs;
    }

    for (old, old_key) in removed {
        let Some(old_key) = old_key else { continue };
        // Among overloads, the version with the same parameter types wins
        let candidate = |same_signature: bool| {
            added.iter().position(|(_, new_key)| {
                new_key.as_ref().map_or(false, |k| {
                    k.is_replacement_of(&old_key)
                        && (!same_signature || k.signature() == old_key.signature())
                })
            })
        };
        let replacement = candidate(true).or_else(|| candidate(false));
        match replacement {
            Some(i) => {
                let (new, _) = added.remove(i);
                plan.ops.push(if old_key.kind() == NodeKind::Field {
                    PatchOp::ReplaceField { original: old, replacement: new }
                } else {
                    PatchOp::ReplaceFunction { original: old, replacement: new }
                });
            }
            None => plan.ops.push(if old_key.kind() == NodeKind::Field {
                PatchOp::RemoveField { field: old }
            } else {
                PatchOp::RemoveFunction { function: old }
            }),
        }
    }
    for (new, key) in added {
        plan_addition(original, changed, parent.original, new, plan);
        let is_field = key.map_or(false, |k| k.kind() == NodeKind::Field);
        plan.ops.push(if is_field {
            PatchOp::AddField { parent: parent.original, field: new }
        } else {
            PatchOp::AddFunction { parent: parent.original, function: new }
        });
    }
    pairs
}

/// Uses of an added member's name in the original graph.
///
/// Unbound uses are re-resolved after patching. A bound use the new member
/// could capture, or an unbound one whose enclosing call is already bound,
/// aborts the subtree.
fn plan_addition(
    original: &CodePropertyGraph,
    changed: &CodePropertyGraph,
    parent: NodeId,
    added: NodeId,
    plan: &mut UnitPlan,
) {
    let (Some(name), Some(kind)) = (changed.name(added), changed.kind(added)) else {
        return;
    };
    let parameters = signature(changed, added);
    let uses: Vec<NodeId> = original
        .nodes()
        .filter(|(_, node)| node.name() == Some(name) && is_name_use(node.kind))
        .map(|(id, _)| id)
        .collect();

    for id in uses {
        let conflict = if is_bound(original, id) {
            may_capture(original, id, kind, &parameters, parent)
        } else {
            bound_call_above(original, id)
        };
        if conflict {
            plan.abort(id, AbortReason::RebindsName { name: name.to_owned() });
        } else if !is_bound(original, id) {
            plan.rebind.push(expression_root(original, id));
        }
    }
}

fn is_name_use(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Reference | NodeKind::MemberAccess | NodeKind::Call | NodeKind::Construct
    )
}

/// Whether a use already carries the edge its resolver would add
fn is_bound(graph: &CodePropertyGraph, id: NodeId) -> bool {
    let (view, label) = match graph.kind(id) {
        Some(NodeKind::Reference | NodeKind::MemberAccess) => (View::Reference, REFERS_TO),
        Some(NodeKind::Call) => (View::Call, INVOKES),
        Some(NodeKind::Construct) => (View::Call, INSTANTIATES),
        _ => return false,
    };
    labelled(graph, id, view, label).next().is_some()
}

fn labelled<'g>(
    graph: &'g CodePropertyGraph,
    id: NodeId,
    view: View,
    label: &'g str,
) -> impl Iterator<Item = NodeId> + 'g {
    graph
        .outgoing(id, view)
        .filter(move |(_, edge)| edge.properties.is_named(label))
        .map(|(_, edge)| edge.target)
}

/// Whether a member of kind `kind` added under `parent` could change what the
/// bound use `id` resolves to
fn may_capture(
    graph: &CodePropertyGraph,
    id: NodeId,
    kind: NodeKind,
    parameters: &[TypeRef],
    parent: NodeId,
) -> bool {
    let accepts =
        || kind.is_function_like() && signature_accepts(parameters, &argument_types(graph, id));
    let visible = || {
        graph.kind(parent) == Some(NodeKind::TranslationUnit)
            || graph.ancestors(id).any(|ancestor| ancestor == parent)
    };
    let member_of_parent = |view: View, label: &str| {
        labelled(graph, id, view, label).any(|target| graph.parent(target) == Some(parent))
    };

    match graph.kind(id) {
        Some(NodeKind::Reference) => visible(),
        Some(NodeKind::MemberAccess) => member_of_parent(View::Reference, REFERS_TO),
        Some(NodeKind::Call) => match graph.child_by_role(id, "receiver") {
            Some(_) => accepts() && member_of_parent(View::Call, INVOKES),
            None => accepts() && visible(),
        },
        Some(NodeKind::Construct) => {
            kind == NodeKind::Constructor
                && accepts()
                && labelled(graph, id, View::Call, INSTANTIATES).any(|record| record == parent)
        }
        _ => false,
    }
}

/// Whether an enclosing call of the expression `id` is already bound; its
/// binding was decided without the type `id` may now get.
fn bound_call_above(graph: &CodePropertyGraph, id: NodeId) -> bool {
    graph
        .ancestors(id)
        .take_while(|ancestor| graph.kind(*ancestor).map_or(false, |k| k.is_expression()))
        .any(|ancestor| {
            matches!(graph.kind(ancestor), Some(NodeKind::Call | NodeKind::Construct))
                && is_bound(graph, ancestor)
        })
}

/// Outermost expression containing `id`
fn expression_root(graph: &CodePropertyGraph, id: NodeId) -> NodeId {
    graph
        .ancestors(id)
        .take_while(|ancestor| graph.kind(*ancestor).map_or(false, |k| k.is_expression()))
        .last()
        .unwrap_or(id)
}

struct Patcher<'g> {
    graph: &'g mut CodePropertyGraph,
    offset: NodeOffset,
    report: ChangeReport,
    dirty: FxHashSet<NodeId>,
}

impl Patcher<'_> {
    fn mark_dirty(&mut self, node: NodeId) {
        if self.dirty.insert(node) {
            self.report.dirty.push(node);
        }
    }

    fn apply(&mut self, op: &PatchOp) -> GraphResult<()> {
        match *op {
            PatchOp::RemoveField { field } => {
                self.clear_references(field);
                self.graph.remove_subtree(field);
            }
            PatchOp::ReplaceField { original, replacement } => {
                let replacement = replacement.offset(self.offset);
                self.report.repointed += self.graph.transfer_edges(original, replacement, View::Reference)?;
                self.graph.transfer_edges(original, replacement, View::DataFlow)?;
                self.graft(original, replacement)?;
            }
            PatchOp::RemoveFunction { function } => {
                self.drop_calls(function);
                self.clear_references(function);
                self.graph.remove_subtree(function);
            }
            PatchOp::ReplaceFunction { original, replacement } => {
                let replacement = replacement.offset(self.offset);
                self.repoint_calls(original, replacement)?;
                self.report.repointed += self.graph.transfer_edges(original, replacement, View::Reference)?;
                self.graft(original, replacement)?;
            }
            PatchOp::AddField { parent, field } => {
                let field = field.offset(self.offset);
                self.graph.reattach(field, parent)?;
                self.mark_dirty(field);
            }
            PatchOp::AddFunction { parent, function } => {
                let function = function.offset(self.offset);
                self.graph.reattach(function, parent)?;
                self.mark_dirty(function);
            }
        }
        Ok(())
    }

    /// Put `replacement` where `original` was and drop the original subtree
    fn graft(&mut self, original: NodeId, replacement: NodeId) -> GraphResult<()> {
        self.graph.replace_child(original, replacement)?;
        self.graph.remove_subtree(original);
        self.mark_dirty(replacement);
        Ok(())
    }

    /// Removed target: every reference loses its target and its type
    fn clear_references(&mut self, target: NodeId) {
        let edges: Vec<(EdgeId, NodeId)> = self
            .graph
            .incoming(target, View::Reference)
            .map(|(id, edge)| (id, edge.source))
            .collect();
        for (edge, source) in edges {
            self.graph.remove_edge(edge);
            if let Some(node) = self.graph.node_mut(source) {
                node.type_ref = TypeRef::Unknown;
            }
            self.report.cleared += 1;
            self.mark_dirty(source);
        }
    }

    /// Removed function: calls drop it from their targets
    fn drop_calls(&mut self, function: NodeId) {
        let edges: Vec<(EdgeId, NodeId)> = self
            .graph
            .incoming(function, View::Call)
            .map(|(id, edge)| (id, edge.source))
            .collect();
        for (edge, call) in edges {
            self.graph.remove_edge(edge);
            self.report.dropped += 1;
            self.retype_call(call);
            self.mark_dirty(call);
        }
    }

    /// Replaced function: calls that still bind follow the replacement, the
    /// rest are dropped. Either way the call is dirty: its argument flows
    /// ended at the parameters of the removed original.
    fn repoint_calls(&mut self, original: NodeId, replacement: NodeId) -> GraphResult<()> {
        let parameters = signature(&*self.graph, replacement);
        let edges: Vec<(EdgeId, NodeId)> = self
            .graph
            .incoming(original, View::Call)
            .map(|(id, edge)| (id, edge.source))
            .collect();
        for (edge, call) in edges {
            let arguments = argument_types(&*self.graph, call);
            if signature_accepts(&parameters, &arguments) {
                self.graph.retarget_edge(edge, replacement)?;
                self.report.repointed += 1;
            } else {
                self.graph.remove_edge(edge);
                self.report.dropped += 1;
            }
            self.retype_call(call);
            self.mark_dirty(call);
        }
        Ok(())
    }

    /// A call bound to exactly one function has that function's return type
    fn retype_call(&mut self, call: NodeId) {
        if self.graph.kind(call) != Some(NodeKind::Call) {
            return;
        }
        let callees: Vec<NodeId> = labelled(self.graph, call, View::Call, INVOKES).collect();
        let returns = match callees.as_slice() {
            [callee] => self
                .graph
                .node(*callee)
                .map_or(TypeRef::Unknown, |f| f.type_ref.clone()),
            _ => TypeRef::Unknown,
        };
        if let Some(node) = self.graph.node_mut(call) {
            node.type_ref = returns;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::{EdgeProperties, Node};

    /// unit "a.c" { int x; f() { ... } }
    fn snapshot(body: &str, with_field: bool) -> (CodePropertyGraph, NodeId, Option<NodeId>) {
        let mut graph = CodePropertyGraph::new();
        let unit = graph.add_node(Node::builder(NodeKind::TranslationUnit).name("a.c").build());
        let field = with_field.then(|| {
            let x = graph.add_node(Node::builder(NodeKind::Field).name("x").typed("int").build());
            graph.add_child(unit, x).unwrap();
            x
        });
        let f = graph.add_node(Node::builder(NodeKind::Function).name("f").build());
        let block = graph.add_node(Node::new(NodeKind::Block));
        let lit = graph.add_node(Node::builder(NodeKind::Literal).code(body).build());
        graph.add_child(unit, f).unwrap();
        graph.add_child(f, block).unwrap();
        graph.add_child(block, lit).unwrap();
        (graph, f, field)
    }

    #[test]
    fn test_identity_plan_is_reusable() {
        let (original, _, _) = snapshot("1", true);
        let (changed, _, _) = snapshot("1", true);

        let plan = ChangeMapper::plan(&original, &changed);

        assert!(plan.is_reusable());
        assert!(plan.units[0].ops.is_empty());
        assert_eq!(plan.units[0].matched, 3);
    }

    #[test]
    fn test_body_change_is_replacement() {
        let (original, f, _) = snapshot("1", true);
        let (changed, f2, _) = snapshot("2", true);

        let plan = ChangeMapper::plan(&original, &changed);

        assert_eq!(
            plan.units[0].ops,
            vec![PatchOp::ReplaceFunction { original: f, replacement: f2 }]
        );
    }

    #[test]
    fn test_unpaired_unit_aborts() {
        let (original, _, _) = snapshot("1", true);
        let mut changed = CodePropertyGraph::new();
        changed.add_node(Node::builder(NodeKind::TranslationUnit).name("b.c").build());

        let plan = ChangeMapper::plan(&original, &changed);

        assert!(!plan.is_reusable());
        assert_eq!(plan.aborted().count(), 2);
    }

    #[test]
    fn test_unmatched_statement_child_aborts() {
        let (original, _, _) = snapshot("1", true);
        let (mut changed, _, _) = snapshot("1", true);
        let root = changed.units()[0];
        let include = changed.add_node(Node::builder(NodeKind::Include).name("stdio.h").build());
        changed.add_child(root, include).unwrap();

        let plan = ChangeMapper::plan(&original, &changed);

        assert!(matches!(
            plan.aborted().next().map(|a| &a.reason),
            Some(AbortReason::UnmatchedChild { kind: NodeKind::Include, .. })
        ));
    }

    fn add_reference(graph: &mut CodePropertyGraph, f: NodeId) -> NodeId {
        let reference = graph.add_node(Node::builder(NodeKind::Reference).name("x").build());
        let block = graph.children(f).next().unwrap();
        graph.add_child(block, reference).unwrap();
        reference
    }

    #[test]
    fn test_removed_field_clears_references() {
        let (mut original, f, field) = snapshot("1", true);
        let field = field.unwrap();
        let reference = add_reference(&mut original, f);
        original.node_mut(reference).unwrap().type_ref = TypeRef::named("int");
        original
            .add_edge(View::Reference, reference, field, EdgeProperties::new())
            .unwrap();
        let (mut changed, changed_f, _) = snapshot("1", false);
        add_reference(&mut changed, changed_f);

        let outcome = ChangeMapper::diff(&mut original, changed).unwrap();

        assert!(!outcome.reanalysis_needed());
        assert!(!original.contains(field));
        assert!(original.contains(f));
        assert!(original.targets(reference, View::Reference).next().is_none());
        assert!(original.node(reference).unwrap().type_ref.is_unknown());
        assert_eq!(outcome.report().dirty, vec![reference]);
        assert_eq!(outcome.report().cleared, 1);
        assert_eq!(original.units().len(), 1);
    }

    /// `f` calling itself, optionally already bound, plus an extra `f()`
    /// overload in the changed snapshot
    fn overload_snapshots(bound: bool) -> (CodePropertyGraph, CodePropertyGraph, NodeId) {
        let with_call = |graph: &mut CodePropertyGraph, f: NodeId| {
            let call = graph.add_node(Node::builder(NodeKind::Call).name("f").build());
            let block = graph.children(f).next().unwrap();
            graph.add_child(block, call).unwrap();
            call
        };
        let (mut original, f, _) = snapshot("1", false);
        let call = with_call(&mut original, f);
        if bound {
            original
                .add_edge(View::Call, call, f, EdgeProperties::new().named(INVOKES))
                .unwrap();
        }
        let (mut changed, changed_f, _) = snapshot("1", false);
        with_call(&mut changed, changed_f);
        let root = changed.units()[0];
        let overload = changed.add_node(Node::builder(NodeKind::Function).name("f").build());
        changed.add_child(root, overload).unwrap();
        (original, changed, call)
    }

    #[test]
    fn test_added_overload_capturing_bound_call_aborts() {
        let (original, changed, call) = overload_snapshots(true);

        let plan = ChangeMapper::plan(&original, &changed);

        assert!(!plan.is_reusable());
        let aborted = plan.aborted().next().unwrap();
        assert_eq!(aborted.node, call);
        assert_eq!(aborted.reason, AbortReason::RebindsName { name: "f".to_string() });
    }

    #[test]
    fn test_added_function_rebinds_unbound_calls() {
        let (original, changed, call) = overload_snapshots(false);

        let plan = ChangeMapper::plan(&original, &changed);

        assert!(plan.is_reusable());
        assert_eq!(plan.units[0].rebind, vec![call]);
        assert!(matches!(plan.units[0].ops[..], [PatchOp::AddFunction { .. }]));
    }

    fn overload(graph: &mut CodePropertyGraph, param: &str, body: &str) -> NodeId {
        let unit = graph.units()[0];
        let f = graph.add_node(Node::builder(NodeKind::Function).name("f").build());
        let p = graph.add_node(Node::builder(NodeKind::Parameter).name("v").typed(param).build());
        let block = graph.add_node(Node::new(NodeKind::Block));
        let lit = graph.add_node(Node::builder(NodeKind::Literal).code(body).build());
        graph.add_child(unit, f).unwrap();
        graph.add_child(f, p).unwrap();
        graph.add_child(f, block).unwrap();
        graph.add_child(block, lit).unwrap();
        f
    }

    fn empty_unit() -> CodePropertyGraph {
        let mut graph = CodePropertyGraph::new();
        graph.add_node(Node::builder(NodeKind::TranslationUnit).name("a.c").build());
        graph
    }

    #[test]
    fn test_overloads_pair_by_signature() {
        let mut original = empty_unit();
        let f_int = overload(&mut original, "int", "1");
        let f_long = overload(&mut original, "long", "1");
        let mut changed = empty_unit();
        let new_long = overload(&mut changed, "long", "2");
        let new_int = overload(&mut changed, "int", "2");

        let plan = ChangeMapper::plan(&original, &changed);

        assert_eq!(
            plan.units[0].ops,
            vec![
                PatchOp::ReplaceFunction { original: f_int, replacement: new_int },
                PatchOp::ReplaceFunction { original: f_long, replacement: new_long },
            ]
        );
    }
}
