//! Frontend port
//!
//! Concrete-syntax parsing is an external concern. A frontend receives one
//! source unit and a [`UnitBuilder`] and populates the structural view and
//! scope tree of that unit. Frontends run on worker threads; a builder is
//! never shared between threads.

use thiserror::Error;

use super::language::Language;
use crate::features::construction::UnitBuilder;
use crate::features::graph::GraphError;
use crate::features::scope::ScopeError;

/// One translation unit handed to a frontend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub name: String,
    pub language: Language,
    pub source: String,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, language: Language, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language,
            source: source.into(),
        }
    }

    /// Detect the language from the file extension of `name`
    pub fn from_path(name: impl Into<String>, source: impl Into<String>) -> Option<Self> {
        let name = name.into();
        let language = Language::from_file_path(&name)?;
        Some(Self::new(name, language, source))
    }
}

/// Frontend failures are reported upward; the driver's failure policy
/// decides whether they abort the translation.
#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("no frontend registered for language '{0}'")]
    UnsupportedLanguage(Language),

    #[error("syntax error in {unit} at line {line}: {reason}")]
    Syntax {
        unit: String,
        line: u32,
        reason: String,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Scope(#[from] ScopeError),
}

impl FrontendError {
    pub fn syntax(unit: impl Into<String>, line: u32, reason: impl Into<String>) -> Self {
        Self::Syntax {
            unit: unit.into(),
            line,
            reason: reason.into(),
        }
    }
}

/// Language frontend
pub trait Frontend: Send + Sync {
    fn language(&self) -> Language;

    fn build(&self, unit: &SourceUnit, builder: &mut UnitBuilder) -> Result<(), FrontendError>;
}

/// Frontends indexed by language, constructed explicitly per translation
#[derive(Default)]
pub struct FrontendSet {
    frontends: Vec<Box<dyn Frontend>>,
}

impl FrontendSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a frontend; a later registration for the same language wins.
    pub fn register(&mut self, frontend: Box<dyn Frontend>) -> &mut Self {
        let language = frontend.language();
        self.frontends.retain(|f| f.language() != language);
        self.frontends.push(frontend);
        self
    }

    pub fn with(mut self, frontend: impl Frontend + 'static) -> Self {
        self.register(Box::new(frontend));
        self
    }

    pub fn for_language(&self, language: Language) -> Option<&dyn Frontend> {
        self.frontends
            .iter()
            .find(|f| f.language() == language)
            .map(|f| f.as_ref())
    }

    pub fn languages(&self) -> Vec<Language> {
        self.frontends.iter().map(|f| f.language()).collect()
    }

    /// Build one unit with the matching frontend
    pub fn build_unit(&self, unit: &SourceUnit) -> Result<UnitBuilder, FrontendError> {
        let frontend = self
            .for_language(unit.language)
            .ok_or(FrontendError::UnsupportedLanguage(unit.language))?;
        let mut builder = UnitBuilder::new(&unit.name);
        frontend.build(unit, &mut builder)?;
        Ok(builder)
    }
}

impl std::fmt::Debug for FrontendSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrontendSet")
            .field("languages", &self.languages())
            .finish()
    }
}
