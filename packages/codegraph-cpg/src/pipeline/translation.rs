//! Translation manager
//!
//! Drives one translation: frontends (optionally on a rayon pool), the
//! frontend barrier, fragment and scope merging, pass scheduling and
//! sequential pass execution. With a previous result it first asks the
//! change mapper whether the old graph can be patched instead.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::cancellation::CancellationToken;
use super::driver::{PassDriver, RunReport};
use super::error::{PipelineError, PipelineResult};
use super::pass::{PassId, PassTargets};
use super::registry::PassRegistry;
use super::scheduler::{PassScheduler, Schedule};
use crate::config::{FrontendFailurePolicy, ValidatedConfig};
use crate::features::change_mapping::{ChangeMapper, ChangeReport, DiffOutcome};
use crate::features::construction::UnitFragment;
use crate::features::graph::{CodePropertyGraph, EdgePropertyRegistry};
use crate::features::scope::ScopeManager;
use crate::shared::models::View;
use crate::shared::ports::{FrontendError, FrontendSet, SourceUnit};

/// Everything one translation produced
#[derive(Debug)]
pub struct TranslationResult {
    pub graph: CodePropertyGraph,
    pub scopes: ScopeManager,
    /// Executed pass order
    pub order: Vec<PassId>,
    /// Hard dependencies added by the scheduler
    pub injected: Vec<PassId>,
    pub run: RunReport,
    /// Units left out under [`FrontendFailurePolicy::Skip`]
    pub skipped_units: Vec<String>,
    /// Diff outcome of an incremental translation
    pub changes: Option<ChangeReport>,
    /// Codecs used to render this run's edge properties
    pub edge_properties: EdgePropertyRegistry,
}

impl TranslationResult {
    /// Whether the graph was patched instead of rebuilt
    pub fn reused_previous(&self) -> bool {
        self.changes.as_ref().map_or(false, ChangeReport::is_reusable)
    }

    /// Edges of `view` as JSON records
    pub fn export_edges(&self, view: View) -> Vec<serde_json::Value> {
        self.graph
            .edges_in(view)
            .map(|(id, edge)| self.edge_properties.render(id, edge))
            .collect()
    }
}

pub struct TranslationManager {
    config: ValidatedConfig,
    frontends: FrontendSet,
    registry: PassRegistry,
    edge_properties: EdgePropertyRegistry,
    cancellation: CancellationToken,
}

impl TranslationManager {
    /// Manager using the built-in passes
    pub fn new(config: ValidatedConfig, frontends: FrontendSet) -> Self {
        Self {
            config,
            frontends,
            registry: PassRegistry::with_builtin_passes(),
            edge_properties: EdgePropertyRegistry::with_standard_properties(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_registry(mut self, registry: PassRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the edge property codecs handed to every result
    pub fn with_edge_properties(mut self, edge_properties: EdgePropertyRegistry) -> Self {
        self.edge_properties = edge_properties;
        self
    }

    pub fn registry_mut(&mut self) -> &mut PassRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// Token that stops the run before the next pass
    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Full translation of `units`
    pub fn translate(&self, units: &[SourceUnit]) -> PipelineResult<TranslationResult> {
        let schedule = self.schedule()?;
        let (graph, scopes, skipped_units) = self.build_graph(units)?;
        self.enrich(graph, scopes, schedule, PassTargets::Units, skipped_units, None)
    }

    /// Translate `units` again, patching `previous` when every unit maps
    pub fn translate_incremental(
        &self,
        previous: TranslationResult,
        units: &[SourceUnit],
    ) -> PipelineResult<TranslationResult> {
        if !self.config.incremental() {
            return self.translate(units);
        }
        let schedule = self.schedule()?;
        let (changed, changed_scopes, skipped_units) = self.build_graph(units)?;

        let mut graph = previous.graph;
        match ChangeMapper::diff(&mut graph, changed)? {
            DiffOutcome::Reused(report) => {
                info!(dirty = report.dirty.len(), "reusing previous graph");
                let scopes = ScopeManager::rebuild(&mut graph)?;
                let targets = PassTargets::Dirty(report.dirty.clone());
                self.enrich(graph, scopes, schedule, targets, skipped_units, Some(report))
            }
            DiffOutcome::Reanalyze { report, changed } => {
                info!(aborted = report.aborted.len(), "full re-analysis");
                self.enrich(
                    changed,
                    changed_scopes,
                    schedule,
                    PassTargets::Units,
                    skipped_units,
                    Some(report),
                )
            }
        }
    }

    fn schedule(&self) -> PipelineResult<Schedule> {
        let requested = self.config.resolve_passes(&self.registry)?;
        let schedule = PassScheduler::new(&self.registry).schedule_ids(&requested)?;
        info!(
            order = ?schedule.order(),
            injected = ?schedule.injected(),
            "passes scheduled"
        );
        Ok(schedule)
    }

    fn enrich(
        &self,
        mut graph: CodePropertyGraph,
        scopes: ScopeManager,
        mut schedule: Schedule,
        targets: PassTargets,
        skipped_units: Vec<String>,
        changes: Option<ChangeReport>,
    ) -> PipelineResult<TranslationResult> {
        let driver = PassDriver::new(self.cancellation.clone());
        let run = driver.run(&mut graph, &scopes, &mut schedule, &targets)?;
        info!(stats = %graph.stats(), cancelled = run.cancelled, "translation finished");
        Ok(TranslationResult {
            graph,
            scopes,
            order: schedule.order().to_vec(),
            injected: schedule.injected().to_vec(),
            run,
            skipped_units,
            changes,
            edge_properties: self.edge_properties.clone(),
        })
    }

    /// Frontends, barrier, merge
    fn build_graph(
        &self,
        units: &[SourceUnit],
    ) -> PipelineResult<(CodePropertyGraph, ScopeManager, Vec<String>)> {
        let built = self.run_frontends(units)?;

        let mut fragments = Vec::with_capacity(built.len());
        let mut skipped = Vec::new();
        for (unit, result) in units.iter().zip(built) {
            match result {
                Ok(fragment) => fragments.push(fragment),
                Err(source) => match self.config.frontend_failure() {
                    FrontendFailurePolicy::Abort => {
                        return Err(PipelineError::frontend_failed(&unit.name, source));
                    }
                    FrontendFailurePolicy::Skip => {
                        warn!(unit = %unit.name, error = %source, "skipping unit");
                        skipped.push(unit.name.clone());
                    }
                },
            }
        }

        let (graph, scopes) = merge_fragments(fragments);
        Ok((graph, scopes, skipped))
    }

    /// One result per unit, in input order. Collecting all of them is the
    /// barrier: nothing reads another unit's fragment before this returns.
    fn run_frontends(
        &self,
        units: &[SourceUnit],
    ) -> PipelineResult<Vec<Result<UnitFragment, FrontendError>>> {
        let build = |unit: &SourceUnit| -> Result<UnitFragment, FrontendError> {
            self.frontends.build_unit(unit)?.finish()
        };

        if !self.config.parallel_frontends() || units.len() < 2 {
            return Ok(units.iter().map(build).collect());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.frontend_threads())
            .build()
            .map_err(|e| PipelineError::ThreadPool(e.to_string()))?;
        debug!(threads = self.config.frontend_threads(), units = units.len(), "frontends on pool");
        Ok(pool.install(|| units.par_iter().map(build).collect()))
    }
}

/// Absorb every fragment into one graph and fold the re-based scope trees
fn merge_fragments(fragments: Vec<UnitFragment>) -> (CodePropertyGraph, ScopeManager) {
    let mut graph = CodePropertyGraph::new();
    let mut managers = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        debug!(unit = %fragment.name, nodes = fragment.graph.node_count(), "merging fragment");
        let offset = graph.absorb(fragment.graph);
        let mut scopes = fragment.scopes;
        scopes.rebase(offset);
        managers.push(scopes);
    }
    let mut scopes = ScopeManager::new();
    scopes.merge_globals(managers);
    (graph, scopes)
}
