//! Safety configuration

use crate::error::SafetyError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How hedge phrases are searched for in generated answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PhraseMatch {
    /// Case-insensitive substring search
    #[default]
    Substring,

    /// Case-insensitive search on word boundaries
    WordBoundary,
}

/// Configuration for the post-generation safety gate
///
/// The hedge phrase list is data: extend it here (or in the config file)
/// rather than in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Literal, case-sensitive prefix a warned answer must open with
    pub warning_prefix: String,

    /// Phrases that undermine a warning when present
    pub hedge_phrases: Vec<String>,

    /// Search mode for hedge phrases
    pub phrase_match: PhraseMatch,

    /// Require every matched rule's drug to be named in the answer
    pub require_rule_citation: bool,
}

/// Hedge phrases enforced by default
pub const DEFAULT_HEDGE_PHRASES: &[&str] = &[
    "but",
    "however",
    "in some cases",
    "may be safe",
    "could be considered",
    "generally safe",
    "should be fine",
];

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            warning_prefix: "WARNING:".to_string(),
            hedge_phrases: DEFAULT_HEDGE_PHRASES.iter().map(|p| p.to_string()).collect(),
            phrase_match: PhraseMatch::Substring,
            require_rule_citation: false,
        }
    }
}

impl GateConfig {
    /// Permissive configuration: word-boundary matching, no citation check
    pub fn permissive() -> Self {
        Self {
            phrase_match: PhraseMatch::WordBoundary,
            ..Self::default()
        }
    }

    /// Strict configuration: broader hedge list and citation enforcement
    pub fn strict() -> Self {
        let mut hedge_phrases: Vec<String> =
            DEFAULT_HEDGE_PHRASES.iter().map(|p| p.to_string()).collect();
        hedge_phrases.extend(
            ["could", "might", "usually", "occasionally", "it depends", "low dose"]
                .iter()
                .map(|p| p.to_string()),
        );
        Self {
            warning_prefix: "WARNING:".to_string(),
            hedge_phrases,
            phrase_match: PhraseMatch::Substring,
            require_rule_citation: true,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), SafetyError> {
        if self.warning_prefix.trim().is_empty() {
            return Err(SafetyError::Config("warning_prefix must not be empty".to_string()));
        }
        if self.hedge_phrases.iter().any(|p| p.trim().is_empty()) {
            return Err(SafetyError::Config("hedge_phrases must not contain empty phrases".to_string()));
        }
        Ok(())
    }
}

/// Configuration for the contraindication checker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    /// Bound on each graph query (seconds); expiry counts as graph unavailable
    pub graph_timeout_secs: u64,

    /// Gate configuration
    pub gate: GateConfig,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            graph_timeout_secs: 10,
            gate: GateConfig::default(),
        }
    }
}

impl SafetyConfig {
    /// Get the graph timeout as a Duration
    pub fn graph_timeout(&self) -> Duration {
        Duration::from_secs(self.graph_timeout_secs)
    }

    /// Strict preset: short graph timeout, strict gate
    pub fn strict() -> Self {
        Self {
            graph_timeout_secs: 5,
            gate: GateConfig::strict(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), SafetyError> {
        if self.graph_timeout_secs == 0 {
            return Err(SafetyError::Config("graph_timeout_secs must be greater than 0".to_string()));
        }
        self.gate.validate()
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, SafetyError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| SafetyError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, SafetyError> {
        toml::to_string_pretty(self)
            .map_err(|e| SafetyError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SafetyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gate.warning_prefix, "WARNING:");
        assert_eq!(config.gate.phrase_match, PhraseMatch::Substring);
        assert!(!config.gate.require_rule_citation);
    }

    #[test]
    fn test_default_hedges_cover_documented_phrases() {
        let gate = GateConfig::default();
        for phrase in ["but", "however", "in some cases", "may be safe", "could be considered"] {
            assert!(gate.hedge_phrases.iter().any(|p| p == phrase), "missing {}", phrase);
        }
    }

    #[test]
    fn test_strict_config() {
        let config = SafetyConfig::strict();
        assert!(config.validate().is_ok());
        assert!(config.gate.require_rule_citation);
        assert!(config.gate.hedge_phrases.iter().any(|p| p == "could"));
    }

    #[test]
    fn test_permissive_gate() {
        let gate = GateConfig::permissive();
        assert_eq!(gate.phrase_match, PhraseMatch::WordBoundary);
        assert!(gate.validate().is_ok());
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = SafetyConfig::default();
        config.graph_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_empty_hedge() {
        let mut config = SafetyConfig::default();
        config.gate.hedge_phrases.push("  ".to_string());
        assert!(matches!(config.validate(), Err(SafetyError::Config(_))));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SafetyConfig::strict();
        let toml_str = config.to_toml().unwrap();
        let parsed = SafetyConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_toml_partial_gate() {
        let toml_str = r#"
graph_timeout_secs = 3

[gate]
warning_prefix = "WARNING:"
hedge_phrases = ["however", "could"]
phrase_match = "word_boundary"
"#;
        let config = SafetyConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.graph_timeout_secs, 3);
        assert_eq!(config.gate.hedge_phrases, vec!["however", "could"]);
        assert_eq!(config.gate.phrase_match, PhraseMatch::WordBoundary);
        assert!(!config.gate.require_rule_citation);
    }

    #[test]
    fn test_toml_missing_fields_use_defaults() {
        let config = SafetyConfig::from_toml("[gate]
require_rule_citation = true
").unwrap();
        assert_eq!(config.graph_timeout_secs, 10);
        assert_eq!(config.gate.warning_prefix, "WARNING:");
        assert!(config.gate.require_rule_citation);
    }
}
