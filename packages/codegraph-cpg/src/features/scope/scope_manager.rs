//! Scope stack and scope tree
//!
//! A `ScopeManager` is built by exactly one unit builder on one thread. After
//! the frontend barrier the per-unit managers are re-based onto the merged
//! graph and folded into one with [`ScopeManager::merge_globals`].

use rustc_hash::FxHashMap;
use tracing::debug;

use super::error::{ScopeError, ScopeResult};
use super::scope::{Scope, ScopeId, ScopeKind};
use crate::features::graph::CodePropertyGraph;
use crate::shared::models::{EdgeProperties, NodeId, NodeOffset, View};

#[derive(Debug, Clone)]
pub struct ScopeManager {
    scopes: Vec<Scope>,
    current: ScopeId,
    by_owner: FxHashMap<NodeId, ScopeId>,
}

impl Default for ScopeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeManager {
    /// Manager with an ownerless global scope
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(ScopeId::global(), ScopeKind::Global, None, None)],
            current: ScopeId::global(),
            by_owner: FxHashMap::default(),
        }
    }

    /// Manager whose global scope is owned by a translation unit root
    pub fn for_unit(root: NodeId) -> Self {
        let mut manager = Self::new();
        manager.scopes[0].owner = Some(root);
        manager.by_owner.insert(root, ScopeId::global());
        manager
    }

    /// Rebuild the scope tree of every unit from the structural view.
    ///
    /// Used after an incremental patch replaced parts of the tree. Scope
    /// edges that already exist are kept rather than duplicated.
    pub fn rebuild(graph: &mut CodePropertyGraph) -> ScopeResult<Self> {
        let mut manager = Self::new();
        let units: Vec<NodeId> = graph.units().to_vec();
        for unit in units {
            manager.by_owner.insert(unit, ScopeId::global());
            let children: Vec<NodeId> = graph.children(unit).collect();
            for child in children {
                manager.rebuild_from(graph, child)?;
            }
        }
        debug!(scopes = manager.scopes.len(), "rebuilt scope tree");
        Ok(manager)
    }

    fn rebuild_from(&mut self, graph: &mut CodePropertyGraph, node: NodeId) -> ScopeResult<()> {
        let kind = graph.kind(node).ok_or(ScopeError::UnknownNode(node))?;
        if kind.is_declaration() {
            self.add_declaration(graph, node)?;
        }
        let opens = ScopeKind::for_owner(kind).is_some();
        if opens {
            self.enter(graph, node)?;
        }
        let children: Vec<NodeId> = graph.children(node).collect();
        for child in children {
            self.rebuild_from(graph, child)?;
        }
        if opens {
            self.leave(node)?;
        }
        Ok(())
    }

    pub fn global(&self) -> ScopeId {
        ScopeId::global()
    }

    pub fn current(&self) -> ScopeId {
        self.current
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.index())
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    fn scope_mut(&mut self, id: ScopeId) -> ScopeResult<&mut Scope> {
        self.scopes
            .get_mut(id.index())
            .ok_or(ScopeError::UnknownScope(id))
    }

    /// Push a child scope of the current scope, owned by `owner`
    pub fn enter(&mut self, graph: &CodePropertyGraph, owner: NodeId) -> ScopeResult<ScopeId> {
        let kind = graph.kind(owner).ok_or(ScopeError::UnknownNode(owner))?;
        let scope_kind =
            ScopeKind::for_owner(kind).ok_or(ScopeError::NotScopeOwner { node: owner, kind })?;

        let id = ScopeId(self.scopes.len() as u32);
        let parent = self.current;
        self.scopes
            .push(Scope::new(id, scope_kind, Some(parent), Some(owner)));
        self.scope_mut(parent)?.children.push(id);
        self.by_owner.insert(owner, id);
        self.current = id;
        Ok(id)
    }

    /// Pop back to the parent scope; `owner` must own the current scope.
    pub fn leave(&mut self, owner: NodeId) -> ScopeResult<ScopeId> {
        let scope = self
            .scope(self.current)
            .ok_or(ScopeError::UnknownScope(self.current))?;
        let Some(parent) = scope.parent else {
            return Err(ScopeError::LeaveGlobal { owner });
        };
        if scope.owner != Some(owner) {
            return Err(ScopeError::OwnerMismatch {
                expected: scope.owner,
                found: owner,
                scope: scope.id,
            });
        }
        self.current = parent;
        Ok(parent)
    }

    /// Register `decl` in the innermost scope able to hold its kind and link
    /// it from the scope owner in the scope view.
    pub fn add_declaration(
        &mut self,
        graph: &mut CodePropertyGraph,
        decl: NodeId,
    ) -> ScopeResult<ScopeId> {
        let node = graph.node(decl).ok_or(ScopeError::UnknownNode(decl))?;
        let kind = node.kind;
        if !kind.is_declaration() {
            return Err(ScopeError::NotDeclaration { node: decl, kind });
        }
        let name = node.name.clone();

        let mut target = self.current;
        loop {
            let scope = self.scope(target).ok_or(ScopeError::UnknownScope(target))?;
            match scope.parent {
                Some(parent) if !scope.kind.can_hold(kind) => target = parent,
                _ => break,
            }
        }

        let scope = self.scope_mut(target)?;
        scope.declare(name, decl);
        // Declarations in a merged global scope are linked from their unit.
        let owner = scope.owner.or_else(|| graph.unit_of(decl));

        if let Some(owner) = owner {
            let linked = graph
                .targets(owner, View::Scope)
                .any(|existing| existing == decl);
            if !linked {
                graph.add_edge(View::Scope, owner, decl, EdgeProperties::new())?;
            }
        }
        Ok(target)
    }

    /// Nearest declaration of `name` visible from the current scope
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.lookup_from(self.current, name)
    }

    /// Nearest declaration of `name` walking outward from `scope`
    pub fn lookup_from(&self, scope: ScopeId, name: &str) -> Option<NodeId> {
        self.chain(scope)
            .find_map(|s| s.lookup_local(name))
    }

    /// Overload set of `name` in the innermost scope declaring it
    pub fn lookup_all(&self, scope: ScopeId, name: &str) -> Vec<NodeId> {
        self.chain(scope)
            .map(|s| s.lookup_local_all(name))
            .find(|decls| !decls.is_empty())
            .map(|decls| decls.to_vec())
            .unwrap_or_default()
    }

    /// Every visible declaration of `name`, innermost scope first
    pub fn lookup_visible(&self, scope: ScopeId, name: &str) -> Vec<NodeId> {
        self.chain(scope)
            .flat_map(|s| s.lookup_local_all(name).iter().copied())
            .collect()
    }

    /// `scope` and its ancestors, innermost first
    pub fn chain(&self, scope: ScopeId) -> impl Iterator<Item = &Scope> + '_ {
        std::iter::successors(self.scope(scope), move |s| {
            s.parent.and_then(|p| self.scope(p))
        })
    }

    pub fn scope_of_owner(&self, owner: NodeId) -> Option<ScopeId> {
        self.by_owner.get(&owner).copied()
    }

    /// Innermost scope whose owner is `node` or one of its structural
    /// ancestors; the global scope when none is.
    pub fn scope_for_node(&self, graph: &CodePropertyGraph, node: NodeId) -> ScopeId {
        std::iter::once(node)
            .chain(graph.ancestors(node))
            .find_map(|n| self.scope_of_owner(n))
            .unwrap_or_else(ScopeId::global)
    }

    /// Shift every node handle after the owning graph fragment was absorbed
    pub fn rebase(&mut self, offset: NodeOffset) {
        for scope in self.scopes.iter_mut() {
            scope.rebase_nodes(offset);
        }
        self.by_owner = self
            .by_owner
            .drain()
            .map(|(owner, scope)| (owner.offset(offset), scope))
            .collect();
    }

    /// Fold independently built managers into this one.
    ///
    /// Global declarations are concatenated in argument order and the other
    /// managers' scopes are appended and re-parented under this global scope.
    pub fn merge_globals(&mut self, others: impl IntoIterator<Item = ScopeManager>) {
        for other in others {
            let shift = self.scopes.len() as u32 - 1;
            let remap = move |id: ScopeId| {
                if id.is_global() {
                    id
                } else {
                    ScopeId(id.0 + shift)
                }
            };

            let mut scopes = other.scopes.into_iter();
            let Some(mut other_global) = scopes.next() else {
                continue;
            };
            other_global.remap_scopes(remap);
            let children = std::mem::take(&mut other_global.children);
            let global = &mut self.scopes[0];
            global.children.extend(children);
            global.absorb_declarations(other_global);

            for mut scope in scopes {
                scope.remap_scopes(remap);
                self.scopes.push(scope);
            }
            for (owner, scope) in other.by_owner {
                self.by_owner.insert(owner, remap(scope));
            }
        }
        debug!(
            scopes = self.scopes.len(),
            globals = self.scopes[0].declarations().len(),
            "merged global scopes"
        );
    }
}
