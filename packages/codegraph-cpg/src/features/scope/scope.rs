//! Lexical scope tree nodes

use rustc_hash::{FxHashMap, FxHashSet};

use crate::shared::models::{NodeId, NodeKind, NodeOffset};

/// Handle of a scope inside one [`ScopeManager`](super::ScopeManager)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub(crate) u32);

impl ScopeId {
    pub fn global() -> Self {
        Self(0)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_global(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for ScopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Translation unit level (merged across units after construction)
    Global,
    /// Record or namespace body
    Structure,
    /// Function-like body including its parameters
    Value,
    /// Block statement and loop headers
    Block,
}

impl ScopeKind {
    /// Scope kind opened by a node of `kind`, if any
    pub fn for_owner(kind: NodeKind) -> Option<ScopeKind> {
        match kind {
            NodeKind::TranslationUnit => Some(ScopeKind::Global),
            NodeKind::Namespace | NodeKind::Record => Some(ScopeKind::Structure),
            NodeKind::Function | NodeKind::Method | NodeKind::Constructor => Some(ScopeKind::Value),
            NodeKind::Block | NodeKind::For | NodeKind::While => Some(ScopeKind::Block),
            _ => None,
        }
    }

    /// Whether a declaration of `kind` may be registered here
    pub fn can_hold(&self, kind: NodeKind) -> bool {
        match self {
            ScopeKind::Global => kind.is_declaration(),
            ScopeKind::Structure => kind.is_value_declaration() || kind.is_structure_declaration(),
            ScopeKind::Value | ScopeKind::Block => kind.is_value_declaration(),
        }
    }
}

/// One lexical environment
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    /// Node that opened the scope; `None` for a merged global scope
    pub owner: Option<NodeId>,
    declarations: Vec<NodeId>,
    declared: FxHashSet<NodeId>,
    symbols: FxHashMap<String, Vec<NodeId>>,
}

impl Scope {
    pub(crate) fn new(id: ScopeId, kind: ScopeKind, parent: Option<ScopeId>, owner: Option<NodeId>) -> Self {
        Self {
            id,
            kind,
            parent,
            children: Vec::new(),
            owner,
            declarations: Vec::new(),
            declared: FxHashSet::default(),
            symbols: FxHashMap::default(),
        }
    }

    /// Declarations in registration order
    pub fn declarations(&self) -> &[NodeId] {
        &self.declarations
    }

    pub(crate) fn declare(&mut self, name: Option<String>, decl: NodeId) {
        if !self.declared.insert(decl) {
            return;
        }
        self.declarations.push(decl);
        if let Some(name) = name {
            self.symbols.entry(name).or_default().push(decl);
        }
    }

    /// First declaration of `name` in this scope only
    pub fn lookup_local(&self, name: &str) -> Option<NodeId> {
        self.symbols.get(name).and_then(|decls| decls.first().copied())
    }

    /// Every declaration of `name` in this scope (an overload set)
    pub fn lookup_local_all(&self, name: &str) -> &[NodeId] {
        self.symbols.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(|k| k.as_str())
    }

    /// Append another scope's declarations, keeping their order
    pub(crate) fn absorb_declarations(&mut self, other: Scope) {
        let Scope { declarations, symbols, .. } = other;
        let fresh: FxHashSet<NodeId> = declarations
            .into_iter()
            .filter(|decl| self.declared.insert(*decl))
            .inspect(|decl| self.declarations.push(*decl))
            .collect();
        for (name, decls) in symbols {
            self.symbols
                .entry(name)
                .or_default()
                .extend(decls.into_iter().filter(|decl| fresh.contains(decl)));
        }
    }

    pub(crate) fn rebase_nodes(&mut self, offset: NodeOffset) {
        self.owner = self.owner.map(|o| o.offset(offset));
        for decl in self.declarations.iter_mut() {
            *decl = decl.offset(offset);
        }
        self.declared = self.declarations.iter().copied().collect();
        for decls in self.symbols.values_mut() {
            for decl in decls.iter_mut() {
                *decl = decl.offset(offset);
            }
        }
    }

    pub(crate) fn remap_scopes(&mut self, map: impl Fn(ScopeId) -> ScopeId) {
        self.id = map(self.id);
        self.parent = self.parent.map(&map);
        for child in self.children.iter_mut() {
            *child = map(*child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_kind_for_owner() {
        assert_eq!(ScopeKind::for_owner(NodeKind::Record), Some(ScopeKind::Structure));
        assert_eq!(ScopeKind::for_owner(NodeKind::Method), Some(ScopeKind::Value));
        assert_eq!(ScopeKind::for_owner(NodeKind::While), Some(ScopeKind::Block));
        assert_eq!(ScopeKind::for_owner(NodeKind::Call), None);
    }

    #[test]
    fn test_can_hold() {
        assert!(ScopeKind::Value.can_hold(NodeKind::Variable));
        assert!(ScopeKind::Block.can_hold(NodeKind::Typedef));
        assert!(!ScopeKind::Value.can_hold(NodeKind::Record));
        assert!(ScopeKind::Structure.can_hold(NodeKind::Record));
        assert!(!ScopeKind::Structure.can_hold(NodeKind::Include));
        assert!(ScopeKind::Global.can_hold(NodeKind::Include));
        assert!(!ScopeKind::Global.can_hold(NodeKind::Call));
    }

    #[test]
    fn test_overload_set_keeps_order() {
        let mut scope = Scope::new(ScopeId::global(), ScopeKind::Global, None, None);
        let a = NodeId::from_index(1);
        let b = NodeId::from_index(2);
        scope.declare(Some("f".into()), a);
        scope.declare(Some("f".into()), b);
        scope.declare(Some("f".into()), a);

        assert_eq!(scope.lookup_local("f"), Some(a));
        assert_eq!(scope.lookup_local_all("f"), &[a, b]);
        assert_eq!(scope.declarations().len(), 2);
    }

    #[test]
    fn test_absorb_and_rebase_keep_declarations_unique() {
        let mut global = Scope::new(ScopeId::global(), ScopeKind::Global, None, None);
        let mut other = Scope::new(ScopeId::global(), ScopeKind::Global, None, None);
        let a = NodeId::from_index(1);
        let b = NodeId::from_index(2);
        global.declare(Some("f".into()), a);
        other.declare(Some("f".into()), a);
        other.declare(Some("g".into()), b);

        global.absorb_declarations(other);
        assert_eq!(global.declarations(), &[a, b]);
        assert_eq!(global.lookup_local_all("f"), &[a]);

        global.rebase_nodes(NodeOffset(10));
        let rebased = NodeId::from_index(11);
        global.declare(Some("f".into()), rebased);
        assert_eq!(global.declarations().len(), 2);
        assert_eq!(global.lookup_local_all("f"), &[rebased]);
    }
}
