//! Configuration System
//!
//! Progressive disclosure in three levels:
//! - Level 1: Preset - one-liner
//! - Level 2: Builder overrides - partial adjustment
//! - Level 3: YAML - complete control
//!
//! # Examples
//!
//! ```rust,ignore
//! use codegraph_cpg::config::{PipelineConfig, Preset};
//!
//! // Level 1
//! let config = PipelineConfig::preset(Preset::Standard).build()?;
//!
//! // Level 2
//! let config = PipelineConfig::preset(Preset::Full)
//!     .passes(["symbol-resolver", "data-flow"])
//!     .frontends(|f| f.threads(4))
//!     .build()?;
//!
//! // Level 3
//! let config = PipelineConfig::from_yaml("cpg.yaml")?;
//! ```

pub mod error;
pub mod frontend_config;
pub mod io;
pub mod pipeline_config;
pub mod preset;
pub mod provenance;
pub mod validation;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use frontend_config::{FrontendConfig, FrontendFailurePolicy};
pub use io::ConfigExportV1;
pub use pipeline_config::{PipelineConfig, ValidatedConfig};
pub use preset::Preset;
pub use provenance::{ConfigProvenance, ConfigSource};
pub use validation::Validatable;
