//! Configuration provenance tracking
//!
//! Track where each configuration value came from (preset, YAML, builder)

use super::preset::Preset;
use std::collections::BTreeMap;

/// Configuration provenance tracking
#[derive(Debug, Clone)]
pub struct ConfigProvenance {
    /// Base preset used
    preset: Preset,

    /// Field → source, for fields not taken from the preset
    field_sources: BTreeMap<String, ConfigSource>,
}

/// Configuration source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// From preset defaults
    Preset(Preset),

    /// From YAML file
    Yaml { path: String },

    /// From builder API
    Builder,
}

impl ConfigProvenance {
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            preset,
            field_sources: BTreeMap::new(),
        }
    }

    /// Record field-level override
    pub fn track_field(&mut self, field: &str, source: ConfigSource) {
        self.field_sources.insert(field.to_string(), source);
    }

    /// Source of `field`; the preset when it was never overridden
    pub fn source_of(&self, field: &str) -> ConfigSource {
        self.field_sources
            .get(field)
            .cloned()
            .unwrap_or(ConfigSource::Preset(self.preset))
    }

    pub fn preset(&self) -> Preset {
        self.preset
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Base preset: {}", self.preset)];
        for (field, source) in &self.field_sources {
            lines.push(format!("  {} <- {}", field, source.describe()));
        }
        lines.join("\n")
    }
}

impl ConfigSource {
    /// Get a short description
    pub fn describe(&self) -> String {
        match self {
            ConfigSource::Preset(p) => format!("preset:{}", p),
            ConfigSource::Yaml { path } => format!("yaml:{}", path),
            ConfigSource::Builder => "builder".to_string(),
        }
    }
}
