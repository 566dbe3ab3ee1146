//! Sequential pass execution
//!
//! Passes run strictly in schedule order, one at a time, each once. The
//! cancellation flag is checked before each pass; a running pass is never
//! interrupted.

use std::time::{Duration, Instant};

use tracing::{info, info_span, warn};

use super::cancellation::CancellationToken;
use super::error::{PipelineError, PipelineResult};
use super::pass::{PassContext, PassId, PassTargets};
use super::scheduler::Schedule;
use crate::features::graph::CodePropertyGraph;
use crate::features::scope::ScopeManager;

/// Outcome of one driver run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Passes that ran, with wall time
    pub executed: Vec<(PassId, Duration)>,
    /// Passes never started because of cancellation
    pub skipped: Vec<PassId>,
    pub cancelled: bool,
}

impl RunReport {
    pub fn executed_ids(&self) -> Vec<PassId> {
        self.executed.iter().map(|(id, _)| *id).collect()
    }

    pub fn total_time(&self) -> Duration {
        self.executed.iter().map(|(_, t)| *t).sum()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PassDriver {
    cancellation: CancellationToken,
}

impl PassDriver {
    pub fn new(cancellation: CancellationToken) -> Self {
        Self { cancellation }
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn run(
        &self,
        graph: &mut CodePropertyGraph,
        scopes: &ScopeManager,
        schedule: &mut Schedule,
        targets: &PassTargets,
    ) -> PipelineResult<RunReport> {
        let mut report = RunReport::default();

        for pass in schedule.passes_mut() {
            let id = pass.descriptor().id;
            if self.cancellation.is_cancelled() {
                report.cancelled = true;
                report.skipped.push(id);
                continue;
            }

            let span = info_span!("pass", id = %id);
            let _guard = span.enter();
            let started = Instant::now();

            let mut ctx = PassContext::new(graph, scopes, targets, &self.cancellation);
            pass.run(&mut ctx)
                .map_err(|source| PipelineError::pass_failed(id, source))?;

            let elapsed = started.elapsed();
            info!(elapsed_ms = elapsed.as_millis() as u64, "pass finished");
            report.executed.push((id, elapsed));
        }

        if report.cancelled {
            warn!(
                skipped = report.skipped.len(),
                "cancellation observed, remaining passes skipped"
            );
        }
        Ok(report)
    }
}
