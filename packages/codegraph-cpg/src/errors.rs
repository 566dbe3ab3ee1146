//! Error types for codegraph-cpg
//!
//! Each module owns a typed error; `CpgError` folds them for callers that
//! only want one error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::features::graph::{GraphError, PropertyError};
use crate::features::scope::ScopeError;
use crate::pipeline::PipelineError;
use crate::shared::ports::FrontendError;

/// Main error type for codegraph-cpg operations
#[derive(Debug, Error)]
pub enum CpgError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Frontend(#[from] FrontendError),

    #[error(transparent)]
    Property(#[from] PropertyError),
}

impl CpgError {
    /// Whether the error was caused by configuration rather than input
    pub fn is_configuration_error(&self) -> bool {
        match self {
            CpgError::Config(_) => true,
            CpgError::Pipeline(e) => e.is_configuration_error(),
            _ => false,
        }
    }
}

/// Result type alias for codegraph-cpg operations
pub type Result<T> = std::result::Result<T, CpgError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PassId;

    #[test]
    fn test_configuration_errors_are_classified() {
        let err: CpgError = PipelineError::unknown_pass("ghost", Some(PassId::new("a"))).into();
        assert!(err.is_configuration_error());

        let err: CpgError = ConfigError::MissingVersion.into();
        assert!(err.is_configuration_error());
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
