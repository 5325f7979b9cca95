//! Error types for the answer pipeline

use medrag_safety::SafetyError;
use thiserror::Error;

/// Errors that abort answering a question
///
/// Gate rejections are not errors: they end in a regenerated or fallback
/// answer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Safety could not be checked (graph unavailable, unknown patient)
    #[error("Safety check failed: {0}")]
    Safety(#[from] SafetyError),

    /// Text generation failed and there was no rule to fall back on
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Text shown to the person who asked, in place of an answer
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Safety(SafetyError::GraphUnavailable(_)) => {
                "Unable to verify medication safety right now because the medical knowledge \
                 graph is unavailable. Please consult your doctor or pharmacist before taking \
                 any medication."
                    .to_string()
            }
            PipelineError::Safety(SafetyError::NotFound(id)) => {
                format!("No matching patient record was found for '{}'.", id)
            }
            PipelineError::Safety(SafetyError::Config(msg)) | PipelineError::Config(msg) => {
                format!("The assistant is not configured correctly: {}", msg)
            }
            PipelineError::Generation(_) => {
                "The answer could not be generated. Please try again later.".to_string()
            }
        }
    }
}
