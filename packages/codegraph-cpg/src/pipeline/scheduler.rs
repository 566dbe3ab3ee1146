//! Pass scheduler
//!
//! Turns a requested pass set into a total execution order:
//! 1. de-duplicate by id (first occurrence wins)
//! 2. inject missing hard dependencies from the registry
//! 3. validate first/last markers
//! 4. Kahn-style selection, lowest registration index first
//!
//! When no pass is eligible the error names the remaining passes and the
//! strongly connected components that form the cycle.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

use super::error::{PipelineError, PipelineResult};
use super::pass::{Pass, PassDescriptor, PassId};
use super::registry::PassRegistry;

/// Ordered passes ready to run
pub struct Schedule {
    passes: Vec<Box<dyn Pass>>,
    order: Vec<PassId>,
    injected: Vec<PassId>,
}

impl Schedule {
    /// Execution order
    pub fn order(&self) -> &[PassId] {
        &self.order
    }

    /// Passes added because a scheduled pass hard-depends on them
    pub fn injected(&self) -> &[PassId] {
        &self.injected
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn position(&self, id: PassId) -> Option<usize> {
        self.order.iter().position(|p| *p == id)
    }

    pub(crate) fn passes_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Pass>> {
        self.passes.iter_mut()
    }
}

impl std::fmt::Debug for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schedule")
            .field("order", &self.order)
            .field("injected", &self.injected)
            .finish()
    }
}

struct Entry {
    descriptor: PassDescriptor,
    pass: Box<dyn Pass>,
}

pub struct PassScheduler<'r> {
    registry: &'r PassRegistry,
}

impl<'r> PassScheduler<'r> {
    pub fn new(registry: &'r PassRegistry) -> Self {
        Self { registry }
    }

    /// Schedule registered passes by id
    pub fn schedule_ids(&self, ids: &[PassId]) -> PipelineResult<Schedule> {
        let passes = ids
            .iter()
            .map(|id| {
                self.registry
                    .create(*id)
                    .ok_or_else(|| PipelineError::unknown_pass(id.as_str(), None))
            })
            .collect::<PipelineResult<Vec<_>>>()?;
        self.schedule(passes)
    }

    pub fn schedule(&self, requested: Vec<Box<dyn Pass>>) -> PipelineResult<Schedule> {
        let mut entries = deduplicate(requested);
        let injected = self.inject_hard_dependencies(&mut entries)?;
        let present: FxHashSet<PassId> = entries.iter().map(|e| e.descriptor.id).collect();

        let (first, last) = validate_markers(&entries, &present)?;
        let order = order_entries(&entries, &present, first, last)?;

        let mut slots: Vec<Option<Entry>> = entries.into_iter().map(Some).collect();
        let mut passes = Vec::with_capacity(order.len());
        let mut ids = Vec::with_capacity(order.len());
        for index in order {
            if let Some(entry) = slots[index].take() {
                ids.push(entry.descriptor.id);
                passes.push(entry.pass);
            }
        }

        info!(
            order = %ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(" -> "),
            injected = injected.len(),
            "pass schedule computed"
        );
        Ok(Schedule {
            passes,
            order: ids,
            injected,
        })
    }

    /// Append every missing hard dependency, transitively, in discovery order
    fn inject_hard_dependencies(&self, entries: &mut Vec<Entry>) -> PipelineResult<Vec<PassId>> {
        let mut present: FxHashSet<PassId> = entries.iter().map(|e| e.descriptor.id).collect();
        let mut injected = Vec::new();
        let mut cursor = 0;
        while cursor < entries.len() {
            let requirer = entries[cursor].descriptor.id;
            let missing: Vec<PassId> = entries[cursor]
                .descriptor
                .hard_dependencies
                .iter()
                .copied()
                .filter(|dep| !present.contains(dep))
                .collect();
            for dep in missing {
                if present.contains(&dep) {
                    continue;
                }
                let pass = self
                    .registry
                    .create(dep)
                    .ok_or_else(|| PipelineError::unknown_pass(dep.as_str(), Some(requirer)))?;
                info!(pass = %dep, required_by = %requirer, "injected hard dependency");
                present.insert(dep);
                injected.push(dep);
                entries.push(Entry {
                    descriptor: pass.descriptor(),
                    pass,
                });
            }
            cursor += 1;
        }
        Ok(injected)
    }
}

fn deduplicate(requested: Vec<Box<dyn Pass>>) -> Vec<Entry> {
    let mut seen = FxHashSet::default();
    let mut entries = Vec::with_capacity(requested.len());
    for pass in requested {
        let descriptor = pass.descriptor();
        if seen.insert(descriptor.id) {
            entries.push(Entry { descriptor, pass });
        } else {
            debug!(pass = %descriptor.id, "dropping duplicate pass");
        }
    }
    entries
}

/// Returns the indices of the first and last pass, if any
fn validate_markers(
    entries: &[Entry],
    present: &FxHashSet<PassId>,
) -> PipelineResult<(Option<usize>, Option<usize>)> {
    let firsts: Vec<usize> = (0..entries.len())
        .filter(|i| entries[*i].descriptor.is_first)
        .collect();
    if firsts.len() > 1 {
        return Err(PipelineError::AmbiguousFirstPass(
            firsts.iter().map(|i| entries[*i].descriptor.id).collect(),
        ));
    }
    let lasts: Vec<usize> = (0..entries.len())
        .filter(|i| entries[*i].descriptor.is_last)
        .collect();
    if lasts.len() > 1 {
        return Err(PipelineError::AmbiguousLastPass(
            lasts.iter().map(|i| entries[*i].descriptor.id).collect(),
        ));
    }

    let first = firsts.first().copied();
    let last = lasts.first().copied();

    if let Some(first) = first {
        let descriptor = &entries[first].descriptor;
        let dependencies: Vec<PassId> = descriptor.effective_dependencies(present).collect();
        if !dependencies.is_empty() {
            return Err(PipelineError::FirstPassHasDependencies {
                pass: descriptor.id,
                dependencies,
            });
        }
    }
    if let Some(last) = last {
        let last_id = entries[last].descriptor.id;
        let dependents: Vec<PassId> = entries
            .iter()
            .filter(|e| e.descriptor.effective_dependencies(present).any(|d| d == last_id))
            .map(|e| e.descriptor.id)
            .collect();
        if !dependents.is_empty() {
            return Err(PipelineError::LastPassHasDependents {
                pass: last_id,
                dependents,
            });
        }
    }
    Ok((first, last))
}

/// Entry indices in execution order
fn order_entries(
    entries: &[Entry],
    present: &FxHashSet<PassId>,
    first: Option<usize>,
    last: Option<usize>,
) -> PipelineResult<Vec<usize>> {
    let index_of: FxHashMap<PassId, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.descriptor.id, i))
        .collect();
    let dependencies: Vec<Vec<usize>> = entries
        .iter()
        .map(|e| {
            e.descriptor
                .effective_dependencies(present)
                .filter_map(|d| index_of.get(&d).copied())
                .collect()
        })
        .collect();

    let mut done = vec![false; entries.len()];
    let mut order = Vec::with_capacity(entries.len());

    if let Some(first) = first {
        done[first] = true;
        order.push(first);
    }

    while order.len() < entries.len() {
        let only_last_left = order.len() + 1 == entries.len();
        let eligible = (0..entries.len()).find(|i| {
            !done[*i]
                && (Some(*i) != last || only_last_left)
                && dependencies[*i].iter().all(|d| done[*d])
        });
        match eligible {
            Some(i) => {
                done[i] = true;
                order.push(i);
            }
            None => {
                let remaining: Vec<usize> = (0..entries.len()).filter(|i| !done[*i]).collect();
                return Err(cycle_error(entries, &dependencies, &remaining));
            }
        }
    }
    Ok(order)
}

fn cycle_error(entries: &[Entry], dependencies: &[Vec<usize>], remaining: &[usize]) -> PipelineError {
    let mut graph: DiGraph<usize, ()> = DiGraph::new();
    let mut nodes: FxHashMap<usize, NodeIndex> = FxHashMap::default();
    for index in remaining {
        nodes.insert(*index, graph.add_node(*index));
    }
    for index in remaining {
        for dep in &dependencies[*index] {
            if let (Some(from), Some(to)) = (nodes.get(dep), nodes.get(index)) {
                graph.add_edge(*from, *to, ());
            }
        }
    }

    let mut cycles: Vec<Vec<PassId>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
        .map(|scc| {
            let mut members: Vec<usize> = scc.iter().map(|n| graph[*n]).collect();
            members.sort_unstable();
            members.into_iter().map(|i| entries[i].descriptor.id).collect()
        })
        .collect();
    cycles.sort();

    PipelineError::DependencyCycle {
        remaining: remaining.iter().map(|i| entries[*i].descriptor.id).collect(),
        cycles,
    }
}
