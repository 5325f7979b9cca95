//! Configuration for the answer pipeline

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the answer pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum time for a single generation call (seconds)
    pub generation_timeout_secs: u64,

    /// Extra generations allowed after a gate rejection
    pub max_regenerations: u32,

    /// Maximum subgraph relationship rows included as context
    pub context_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            generation_timeout_secs: 300,
            max_regenerations: 1,
            context_limit: 100,
        }
    }
}

impl PipelineConfig {
    /// Get the generation timeout as a Duration
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// Strict preset: no regeneration, rejected answers fall back at once
    pub fn strict() -> Self {
        Self {
            generation_timeout_secs: 120,
            max_regenerations: 0,
            context_limit: 50,
        }
    }

    /// Lenient preset: more regeneration attempts and context
    pub fn lenient() -> Self {
        Self {
            generation_timeout_secs: 600,
            max_regenerations: 3,
            context_limit: 200,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.generation_timeout_secs == 0 {
            return Err(PipelineError::Config(
                "generation_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.context_limit == 0 {
            return Err(PipelineError::Config("context_limit must be greater than 0".to_string()));
        }
        if self.max_regenerations > 5 {
            return Err(PipelineError::Config("max_regenerations cannot exceed 5".to_string()));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, PipelineError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| PipelineError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, PipelineError> {
        toml::to_string_pretty(self)
            .map_err(|e| PipelineError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
        assert!(PipelineConfig::strict().validate().is_ok());
        assert!(PipelineConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        let mut config = PipelineConfig::default();
        config.context_limit = 0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.max_regenerations = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = PipelineConfig::lenient();
        let toml_str = config.to_toml().unwrap();
        assert_eq!(PipelineConfig::from_toml(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_from_toml_validates() {
        let toml_str = "generation_timeout_secs = 0\nmax_regenerations = 1\ncontext_limit = 10\n";
        assert!(matches!(
            PipelineConfig::from_toml(toml_str),
            Err(PipelineError::Config(_))
        ));
    }
}
