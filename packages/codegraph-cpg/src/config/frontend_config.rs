//! Frontend execution settings

use super::error::{ConfigError, ConfigResult};
use super::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Upper bound for the frontend worker pool
pub const MAX_FRONTEND_THREADS: usize = 1024;

/// What a failing frontend does to the translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontendFailurePolicy {
    /// The whole translation fails
    #[default]
    Abort,
    /// The unit is left out and a warning is logged
    Skip,
}

/// Frontend worker configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
    /// Run one frontend per unit on a worker pool
    pub parallel: bool,

    /// Worker count (1..=1024)
    pub threads: usize,

    pub failure: FrontendFailurePolicy,
}

impl FrontendConfig {
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn failure(mut self, policy: FrontendFailurePolicy) -> Self {
        self.failure = policy;
        self
    }
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            parallel: cfg!(feature = "parallel"),
            threads: num_cpus::get().clamp(1, MAX_FRONTEND_THREADS),
            failure: FrontendFailurePolicy::Abort,
        }
    }
}

impl Validatable for FrontendConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.threads < 1 || self.threads > MAX_FRONTEND_THREADS {
            return Err(ConfigError::range_with_hint(
                "frontend_threads",
                self.threads,
                1,
                MAX_FRONTEND_THREADS,
                "At least one worker is needed",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "FrontendConfig"
    }
}
