//! Pass registry
//!
//! Maps pass ids to factories. The scheduler instantiates hard dependencies
//! that were not requested from here. A registry is constructed explicitly for
//! each translation; there is no process-wide instance.

use super::pass::{Pass, PassId};
use crate::features::passes::{
    CallResolverPass, ControlFlowPass, DataFlowPass, SymbolResolverPass, TypeHierarchyPass,
    UnreachableCodePass,
};

type PassFactory = Box<dyn Fn() -> Box<dyn Pass> + Send + Sync>;

#[derive(Default)]
pub struct PassRegistry {
    factories: Vec<(PassId, PassFactory)>,
}

impl PassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in pass
    pub fn with_builtin_passes() -> Self {
        let mut registry = Self::new();
        registry.register(TypeHierarchyPass::ID, || Box::new(TypeHierarchyPass));
        registry.register(SymbolResolverPass::ID, || Box::new(SymbolResolverPass::default()));
        registry.register(CallResolverPass::ID, || Box::new(CallResolverPass::default()));
        registry.register(ControlFlowPass::ID, || Box::new(ControlFlowPass::default()));
        registry.register(DataFlowPass::ID, || Box::new(DataFlowPass::default()));
        registry.register(UnreachableCodePass::ID, || Box::new(UnreachableCodePass::default()));
        registry
    }

    /// Register a factory; a later registration under the same id wins.
    pub fn register<F>(&mut self, id: PassId, factory: F) -> &mut Self
    where
        F: Fn() -> Box<dyn Pass> + Send + Sync + 'static,
    {
        self.factories.retain(|(existing, _)| *existing != id);
        self.factories.push((id, Box::new(factory)));
        self
    }

    pub fn contains(&self, id: PassId) -> bool {
        self.factories.iter().any(|(existing, _)| *existing == id)
    }

    /// New instance of pass `id`
    pub fn create(&self, id: PassId) -> Option<Box<dyn Pass>> {
        self.factories
            .iter()
            .find(|(existing, _)| *existing == id)
            .map(|(_, factory)| factory())
    }

    /// Registered id spelled `name`
    pub fn resolve_name(&self, name: &str) -> Option<PassId> {
        self.factories
            .iter()
            .map(|(id, _)| *id)
            .find(|id| id.as_str() == name)
    }

    /// Registered ids in registration order
    pub fn ids(&self) -> Vec<PassId> {
        self.factories.iter().map(|(id, _)| *id).collect()
    }
}

impl std::fmt::Debug for PassRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassRegistry")
            .field("passes", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_passes_are_registered() {
        let registry = PassRegistry::with_builtin_passes();

        assert_eq!(registry.ids().len(), 6);
        assert_eq!(
            registry.resolve_name("control-flow"),
            Some(ControlFlowPass::ID)
        );
        assert!(registry.resolve_name("taint").is_none());

        let pass = registry.create(DataFlowPass::ID).unwrap();
        assert_eq!(pass.descriptor().id, DataFlowPass::ID);
    }
}
