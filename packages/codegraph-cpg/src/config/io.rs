//! Configuration I/O
//!
//! Defines the YAML schema. Loading and export live in pipeline_config.rs.

use super::frontend_config::FrontendFailurePolicy;
use serde::{Deserialize, Serialize};

/// Schema versions this crate reads
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// YAML Schema v1
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1)
    #[serde(default)]
    pub version: Option<u32>,

    /// Base preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Requested passes; the preset's list when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passes: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_frontends: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend_threads: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend_failure: Option<FrontendFailurePolicy>,

    /// Reuse the previous graph when the change mapper allows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incremental: Option<bool>,
}
