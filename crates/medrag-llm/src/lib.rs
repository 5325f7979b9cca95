//! medrag LLM Provider Layer
//!
//! Implementations of the `TextGenerator` trait from `medrag-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: scripted responses for tests
//! - `OllamaProvider`: local Ollama API integration
//!
//! # Examples
//!
//! ```
//! use medrag_domain::traits::TextGenerator;
//! use medrag_domain::Prompt;
//! use medrag_llm::MockProvider;
//!
//! # async fn example() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.generate(&Prompt::new("", vec![], "hi")).await.unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod mock;
pub mod ollama;

use thiserror::Error;

pub use mock::MockProvider;
pub use ollama::{OllamaConfig, OllamaProvider};

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Request exceeded its time limit
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}
