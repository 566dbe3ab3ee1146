//! Typed pipeline errors
//!
//! Configuration errors (scheduling) are detected before any pass runs.
//! Execution errors carry the failing pass or unit and the source error.

use thiserror::Error;

use super::pass::{PassError, PassId};
use crate::config::ConfigError;
use crate::features::graph::GraphError;
use crate::features::scope::ScopeError;
use crate::shared::ports::FrontendError;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// More than one pass claims the first slot
    #[error("more than one pass is marked first: {}", join(.0))]
    AmbiguousFirstPass(Vec<PassId>),

    /// More than one pass claims the last slot
    #[error("more than one pass is marked last: {}", join(.0))]
    AmbiguousLastPass(Vec<PassId>),

    #[error("pass {pass} is marked first but depends on {}", join(.dependencies))]
    FirstPassHasDependencies {
        pass: PassId,
        dependencies: Vec<PassId>,
    },

    #[error("pass {pass} is marked last but {} depend on it", join(.dependents))]
    LastPassHasDependents {
        pass: PassId,
        dependents: Vec<PassId>,
    },

    /// No remaining pass is eligible
    #[error("dependency cycle among passes: {} (cycles: {})", join(.remaining), cycles_to_string(.cycles))]
    DependencyCycle {
        remaining: Vec<PassId>,
        cycles: Vec<Vec<PassId>>,
    },

    /// Hard dependency that is neither requested nor registered
    #[error("unknown pass '{pass}' required by {required_by:?}")]
    UnknownPass {
        pass: String,
        required_by: Option<PassId>,
    },

    #[error("pass {pass} failed: {source}")]
    PassFailed {
        pass: PassId,
        #[source]
        source: PassError,
    },

    #[error("frontend failed for {unit}: {source}")]
    FrontendFailed {
        unit: String,
        #[source]
        source: FrontendError,
    },

    #[error("failed to build frontend thread pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn join(ids: &[PassId]) -> String {
    ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
}

fn cycles_to_string(cycles: &[Vec<PassId>]) -> String {
    cycles
        .iter()
        .map(|cycle| format!("[{}]", join(cycle)))
        .collect::<Vec<_>>()
        .join(" ")
}

impl PipelineError {
    pub fn unknown_pass(pass: impl Into<String>, required_by: Option<PassId>) -> Self {
        Self::UnknownPass {
            pass: pass.into(),
            required_by,
        }
    }

    pub fn pass_failed(pass: PassId, source: PassError) -> Self {
        Self::PassFailed { pass, source }
    }

    pub fn frontend_failed(unit: impl Into<String>, source: FrontendError) -> Self {
        Self::FrontendFailed {
            unit: unit.into(),
            source,
        }
    }

    /// Errors caused by the requested pass set or configuration
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::AmbiguousFirstPass(_)
                | Self::AmbiguousLastPass(_)
                | Self::FirstPassHasDependencies { .. }
                | Self::LastPassHasDependents { .. }
                | Self::DependencyCycle { .. }
                | Self::UnknownPass { .. }
                | Self::Config(_)
        )
    }

    /// Error category for logs
    pub fn category(&self) -> &'static str {
        match self {
            Self::AmbiguousFirstPass(_)
            | Self::AmbiguousLastPass(_)
            | Self::FirstPassHasDependencies { .. }
            | Self::LastPassHasDependents { .. } => "ordering",
            Self::DependencyCycle { .. } => "cycle",
            Self::UnknownPass { .. } => "unknown_pass",
            Self::PassFailed { .. } => "pass",
            Self::FrontendFailed { .. } => "frontend",
            Self::ThreadPool(_) => "thread_pool",
            Self::Graph(_) => "graph",
            Self::Scope(_) => "scope",
            Self::Config(_) => "config",
        }
    }
}

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
