/*
 * Codegraph CPG - Code Property Graph Engine
 *
 * Feature-First Architecture:
 * - shared/      : Common models (Node, Edge, Span, TypeRef) and the frontend port
 * - features/    : Graph store, scopes, unit construction, passes, change mapping
 * - pipeline/    : Pass scheduling, execution and translation
 * - config/      : Presets, builder overrides, YAML
 *
 * Concurrency:
 * - Frontends run one unit per rayon worker
 * - Passes run sequentially over the merged graph
 */

#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::should_implement_trait)] // from_str naming intentional
#![allow(clippy::module_inception)] // Module naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and ports
pub mod shared;

/// Feature modules (graph, scope, construction, passes, change mapping)
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{PipelineConfig, Preset, ValidatedConfig};
pub use errors::{CpgError, Result};
pub use features::change_mapping::{ChangeMapper, ChangeReport, DiffOutcome};
pub use features::construction::{UnitBuilder, UnitFragment};
pub use features::graph::{CodePropertyGraph, GraphError};
pub use features::scope::{ScopeError, ScopeManager};
pub use pipeline::{
    CancellationToken, Pass, PassContext, PassDescriptor, PassDriver, PassError, PassId,
    PassRegistry, PassScheduler, PipelineError, TranslationManager, TranslationResult,
};
pub use shared::models::{Edge, EdgeId, EdgeProperties, Node, NodeId, NodeKind, TypeRef, View};
pub use shared::ports::{Frontend, FrontendError, FrontendSet, Language, SourceUnit};
