//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use medrag_domain::AliasDictionary;
use medrag_graph::Neo4jConfig;
use medrag_llm::OllamaConfig;
use medrag_pipeline::PipelineConfig;
use medrag_safety::{builtin_aliases, load_aliases, SafetyConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
///
/// Every table is optional in the file; missing keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Alias file replacing the built-in tables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aliases_path: Option<PathBuf>,

    /// Graph connection
    pub neo4j: Neo4jConfig,

    /// Text generation
    pub ollama: OllamaConfig,

    /// Contraindication check and gate
    pub safety: SafetyConfig,

    /// Answer pipeline
    pub pipeline: PipelineConfig,

    /// Global settings
    pub settings: Settings,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Enable colored output
    pub color: bool,

    /// Default output format
    pub format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl Config {
    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".medrag").join("config.toml"))
    }

    /// Resolve the file to use: the explicit path, else the default location.
    pub fn resolve_path(custom: Option<&str>) -> Result<PathBuf> {
        match custom {
            Some(path) => Ok(PathBuf::from(path)),
            None => Self::path(),
        }
    }

    /// Load configuration.
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn load(custom: Option<&str>) -> Result<Self> {
        let path = Self::resolve_path(custom)?;
        if custom.is_none() && !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load and validate configuration from a file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize configuration to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.neo4j.validate()?;
        self.ollama.validate()?;
        self.safety.validate()?;
        self.pipeline.validate()?;
        Ok(())
    }

    /// Apply connection overrides from flags or the environment.
    pub fn apply_overrides(
        &mut self,
        url: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) {
        if let Some(url) = url {
            self.neo4j.url = url;
        }
        if let Some(username) = username {
            self.neo4j.username = username;
        }
        if let Some(password) = password {
            self.neo4j.password = Some(password);
        }
    }

    /// Load the alias dictionary this configuration names.
    pub fn aliases(&self) -> Result<AliasDictionary> {
        let dictionary = match &self.aliases_path {
            Some(path) => load_aliases(path)?,
            None => builtin_aliases()?,
        };
        Ok(dictionary)
    }

    /// Copy with the password masked, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.neo4j.password.is_some() {
            config.neo4j.password = Some("********".to_string());
        }
        config
    }
}
