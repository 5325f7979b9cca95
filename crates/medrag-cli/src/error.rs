//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Safety check error
    #[error(transparent)]
    Safety(#[from] medrag_safety::SafetyError),

    /// Answer pipeline error
    #[error(transparent)]
    Pipeline(#[from] medrag_pipeline::PipelineError),

    /// Graph store error
    #[error("Graph store error: {0}")]
    Graph(#[from] medrag_graph::GraphError),

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(#[from] medrag_llm::LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
