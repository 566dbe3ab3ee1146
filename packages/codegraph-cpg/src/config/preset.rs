//! Preset configurations
//!
//! Presets provide the default pass list for common use cases.

use serde::{Deserialize, Serialize};

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Name binding only
    ///
    /// - Passes: type-hierarchy, symbol-resolver
    Structural,

    /// Day-to-day analysis
    ///
    /// - Passes: structural + call-resolver, control-flow
    Standard,

    /// Every built-in pass
    ///
    /// - Passes: standard + data-flow, unreachable-code
    Full,
}

impl Preset {
    /// Default pass names for this preset, in registration order
    pub fn default_passes(&self) -> &'static [&'static str] {
        match self {
            Self::Structural => &["type-hierarchy", "symbol-resolver"],
            Self::Standard => &[
                "type-hierarchy",
                "symbol-resolver",
                "call-resolver",
                "control-flow",
            ],
            Self::Full => &[
                "type-hierarchy",
                "symbol-resolver",
                "call-resolver",
                "control-flow",
                "data-flow",
                "unreachable-code",
            ],
        }
    }

    /// Parse preset from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "structural" => Ok(Self::Structural),
            "standard" => Ok(Self::Standard),
            "full" => Ok(Self::Full),
            _ => Err(format!(
                "Unknown preset '{}'. Valid presets: structural, standard, full",
                s
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Standard => "standard",
            Self::Full => "full",
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::Standard
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parsing() {
        assert_eq!(Preset::from_str("structural").unwrap(), Preset::Structural);
        assert_eq!(Preset::from_str("FULL").unwrap(), Preset::Full);
        assert!(Preset::from_str("thorough").is_err());
    }

    #[test]
    fn test_presets_grow() {
        let structural = Preset::Structural.default_passes();
        let standard = Preset::Standard.default_passes();
        let full = Preset::Full.default_passes();

        assert!(structural.iter().all(|p| standard.contains(p)));
        assert!(standard.iter().all(|p| full.contains(p)));
        assert_eq!(full.len(), 6);
    }

    #[test]
    fn test_default_preset() {
        assert_eq!(Preset::default(), Preset::Standard);
        assert_eq!(Preset::default().to_string(), "standard");
    }
}
