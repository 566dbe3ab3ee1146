//! Ports - seams to external collaborators

pub mod frontend;
pub mod language;

pub use frontend::{Frontend, FrontendError, FrontendSet, SourceUnit};
pub use language::Language;
