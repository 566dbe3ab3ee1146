//! Pipeline orchestration
//!
//! Pass abstraction, registry, dependency-aware scheduling, sequential pass
//! execution and the translation manager that ties frontends and passes
//! together.

pub mod cancellation;
pub mod driver;
pub mod error;
pub mod pass;
pub mod registry;
pub mod scheduler;
pub mod translation;

pub use cancellation::CancellationToken;
pub use driver::{PassDriver, RunReport};
pub use error::{PipelineError, PipelineResult};
pub use pass::{Pass, PassContext, PassDescriptor, PassError, PassId, PassTargets};
pub use registry::PassRegistry;
pub use scheduler::{PassScheduler, Schedule};
pub use translation::{TranslationManager, TranslationResult};
