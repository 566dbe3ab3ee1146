//! Pipeline configuration
//!
//! Preset-based defaults with builder and YAML overrides.

use std::path::Path;

use super::{
    error::{ConfigError, ConfigResult},
    frontend_config::{FrontendConfig, FrontendFailurePolicy},
    io::{ConfigExportV1, SUPPORTED_VERSIONS},
    preset::Preset,
    provenance::{ConfigProvenance, ConfigSource},
    validation::Validatable,
};
use crate::pipeline::{PassId, PassRegistry};

/// Translation pipeline configuration (unvalidated)
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Base preset
    pub(crate) preset: Preset,

    /// Explicit pass list; `None` uses the preset's
    pub(crate) passes: Option<Vec<String>>,

    pub(crate) frontends: FrontendConfig,

    /// Try the change mapper before re-running passes on a new snapshot
    pub(crate) incremental: bool,

    pub(crate) provenance: ConfigProvenance,
}

impl PipelineConfig {
    /// Level 1: Create from preset
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            passes: None,
            frontends: FrontendConfig::default(),
            incremental: true,
            provenance: ConfigProvenance::from_preset(preset),
        }
    }

    /// Level 2: Replace the pass list
    pub fn passes<I, S>(mut self, passes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.passes = Some(passes.into_iter().map(Into::into).collect());
        self.provenance.track_field("passes", ConfigSource::Builder);
        self
    }

    /// Append one pass to the current (preset or explicit) list
    pub fn add_pass(mut self, pass: impl Into<String>) -> Self {
        let mut passes = self.pass_names();
        passes.push(pass.into());
        self.passes = Some(passes);
        self.provenance.track_field("passes", ConfigSource::Builder);
        self
    }

    /// Level 2: Override frontend settings (closure based)
    pub fn frontends<F>(mut self, f: F) -> Self
    where
        F: FnOnce(FrontendConfig) -> FrontendConfig,
    {
        self.frontends = f(self.frontends);
        self.provenance.track_field("frontends.*", ConfigSource::Builder);
        self
    }

    pub fn incremental(mut self, enabled: bool) -> Self {
        self.incremental = enabled;
        self.provenance.track_field("incremental", ConfigSource::Builder);
        self
    }

    fn pass_names(&self) -> Vec<String> {
        match &self.passes {
            Some(passes) => passes.clone(),
            None => self
                .preset
                .default_passes()
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }

    /// Build and validate
    pub fn build(self) -> ConfigResult<ValidatedConfig> {
        self.frontends.validate()?;
        if let Some(passes) = &self.passes {
            if passes.iter().any(|p| p.trim().is_empty()) {
                return Err(ConfigError::Validation(
                    "pass names must not be empty".to_string(),
                ));
            }
        }
        Ok(ValidatedConfig(self))
    }

    /// Level 3: Load from a YAML file (v1 schema)
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<ValidatedConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content, &path.display().to_string())
    }

    /// Parse YAML text; `origin` names the source in provenance
    pub fn from_yaml_str(content: &str, origin: &str) -> ConfigResult<ValidatedConfig> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        let version = export.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = match export.preset {
            Some(name) => Preset::from_str(&name).map_err(|_| ConfigError::UnknownPreset(name))?,
            None => Preset::default(),
        };

        let mut config = Self::preset(preset);
        let source = || ConfigSource::Yaml {
            path: origin.to_string(),
        };

        if let Some(passes) = export.passes {
            config.passes = Some(passes);
            config.provenance.track_field("passes", source());
        }
        if let Some(parallel) = export.parallel_frontends {
            config.frontends.parallel = parallel;
            config.provenance.track_field("parallel_frontends", source());
        }
        if let Some(threads) = export.frontend_threads {
            config.frontends.threads = threads;
            config.provenance.track_field("frontend_threads", source());
        }
        if let Some(policy) = export.frontend_failure {
            config.frontends.failure = policy;
            config.provenance.track_field("frontend_failure", source());
        }
        if let Some(incremental) = export.incremental {
            config.incremental = incremental;
            config.provenance.track_field("incremental", source());
        }

        config.build()
    }

    /// Export to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: Some(1),
            preset: Some(self.preset.to_string()),
            passes: self.passes.clone(),
            parallel_frontends: Some(self.frontends.parallel),
            frontend_threads: Some(self.frontends.threads),
            frontend_failure: Some(self.frontends.failure),
            incremental: Some(self.incremental),
        };
        Ok(serde_yaml::to_string(&export)?)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

/// Validated configuration (immutable, safe to use)
#[derive(Debug, Clone)]
pub struct ValidatedConfig(PipelineConfig);

impl ValidatedConfig {
    pub fn into_inner(self) -> PipelineConfig {
        self.0
    }

    pub fn as_inner(&self) -> &PipelineConfig {
        &self.0
    }

    pub fn preset(&self) -> Preset {
        self.0.preset
    }

    /// Effective pass names, in requested order
    pub fn pass_names(&self) -> Vec<String> {
        self.0.pass_names()
    }

    pub fn frontends(&self) -> &FrontendConfig {
        &self.0.frontends
    }

    pub fn parallel_frontends(&self) -> bool {
        self.0.frontends.parallel
    }

    pub fn frontend_threads(&self) -> usize {
        self.0.frontends.threads
    }

    pub fn frontend_failure(&self) -> FrontendFailurePolicy {
        self.0.frontends.failure
    }

    pub fn incremental(&self) -> bool {
        self.0.incremental
    }

    pub fn provenance(&self) -> &ConfigProvenance {
        &self.0.provenance
    }

    /// Map pass names to registered ids; unknown names are an error with the
    /// closest registered name as suggestion.
    pub fn resolve_passes(&self, registry: &PassRegistry) -> ConfigResult<Vec<PassId>> {
        self.pass_names()
            .into_iter()
            .map(|name| {
                registry.resolve_name(&name).ok_or_else(|| {
                    let known: Vec<&str> = registry.ids().iter().map(|id| id.as_str()).collect();
                    ConfigError::unknown_pass_with_suggestion(name, &known)
                })
            })
            .collect()
    }

    pub fn summary(&self) -> String {
        format!(
            "{}\npasses: {}\nfrontends: parallel={} threads={} failure={:?}\nincremental: {}",
            self.0.provenance.summary(),
            self.pass_names().join(", "),
            self.parallel_frontends(),
            self.frontend_threads(),
            self.frontend_failure(),
            self.incremental(),
        )
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        self.0.to_yaml()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::passes::{ControlFlowPass, SymbolResolverPass};

    #[test]
    fn test_preset_passes() {
        let config = PipelineConfig::preset(Preset::Structural).build().unwrap();
        assert_eq!(config.pass_names(), vec!["type-hierarchy", "symbol-resolver"]);
        assert_eq!(
            config.provenance().source_of("passes"),
            ConfigSource::Preset(Preset::Structural)
        );
    }

    #[test]
    fn test_builder_overrides() {
        let config = PipelineConfig::preset(Preset::Structural)
            .passes(["symbol-resolver"])
            .add_pass("control-flow")
            .frontends(|f| f.threads(2).failure(FrontendFailurePolicy::Skip))
            .incremental(false)
            .build()
            .unwrap();

        assert_eq!(config.pass_names(), vec!["symbol-resolver", "control-flow"]);
        assert_eq!(config.frontend_threads(), 2);
        assert_eq!(config.frontend_failure(), FrontendFailurePolicy::Skip);
        assert!(!config.incremental());
        assert_eq!(config.provenance().source_of("passes"), ConfigSource::Builder);
    }

    #[test]
    fn test_resolve_passes() {
        let registry = PassRegistry::with_builtin_passes();
        let config = PipelineConfig::default()
            .passes(["symbol-resolver", "control-flow"])
            .build()
            .unwrap();

        assert_eq!(
            config.resolve_passes(&registry).unwrap(),
            vec![SymbolResolverPass::ID, ControlFlowPass::ID]
        );
    }

    #[test]
    fn test_resolve_unknown_pass_suggests() {
        let registry = PassRegistry::with_builtin_passes();
        let config = PipelineConfig::default()
            .passes(["symbol-resolvr"])
            .build()
            .unwrap();

        let err = config.resolve_passes(&registry).unwrap_err();
        assert!(err.to_string().contains("Did you mean 'symbol-resolver'?"));
    }

    #[test]
    fn test_yaml_str() {
        let yaml = r#"
version: 1
preset: full
frontend_threads: 3
frontend_failure: skip
"#;
        let config = PipelineConfig::from_yaml_str(yaml, "inline").unwrap();
        assert_eq!(config.preset(), Preset::Full);
        assert_eq!(config.pass_names().len(), 6);
        assert_eq!(config.frontend_threads(), 3);
        assert_eq!(config.frontend_failure(), FrontendFailurePolicy::Skip);
    }

    #[test]
    fn test_yaml_missing_version() {
        let err = PipelineConfig::from_yaml_str("preset: full\n", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::MissingVersion));
    }

    #[test]
    fn test_yaml_unknown_field() {
        let err = PipelineConfig::from_yaml_str("version: 1\nthreads: 4\n", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_yaml_roundtrip_keeps_settings() {
        let config = PipelineConfig::preset(Preset::Full)
            .passes(["control-flow"])
            .frontends(|f| f.threads(4));

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("preset: full"));

        let back = PipelineConfig::from_yaml_str(&yaml, "inline").unwrap();
        assert_eq!(back.pass_names(), vec!["control-flow"]);
        assert_eq!(back.frontend_threads(), 4);
    }

    #[test]
    fn test_invalid_threads_rejected_on_load() {
        let err = PipelineConfig::from_yaml_str("version: 1\nfrontend_threads: 0\n", "inline")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Range { .. }));
    }
}
