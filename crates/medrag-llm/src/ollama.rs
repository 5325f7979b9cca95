//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API (`/api/generate`).
//!
//! # Features
//!
//! - Async HTTP communication with the Ollama API
//! - System instructions sent separately from the question and context
//! - Retry logic with exponential backoff for transport failures
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use medrag_domain::traits::TextGenerator;
//! use medrag_domain::Prompt;
//! use medrag_llm::OllamaProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3")?;
//! let answer = provider.generate(&Prompt::new("", vec![], "What is CKD?")).await?;
//! println!("{}", answer);
//! # Ok(())
//! # }
//! ```

use crate::LlmError;
use medrag_domain::traits::TextGenerator;
use medrag_domain::Prompt;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default model
pub const DEFAULT_MODEL: &str = "llama3";

/// Default timeout for LLM requests (5 minutes; local models are slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Default number of attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Settings for [`OllamaProvider`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// API endpoint
    pub endpoint: String,

    /// Model to use (e.g., "llama3", "mistral")
    pub model: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Attempts per generation, including the first
    pub max_retries: u32,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl OllamaConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.model.trim().is_empty() {
            return Err(LlmError::Other("model must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(LlmError::Other("timeout_secs must be greater than 0".to_string()));
        }
        if self.max_retries == 0 {
            return Err(LlmError::Other("max_retries must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Ollama API provider for local LLM inference
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    timeout_secs: u64,
    max_retries: u32,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    #[serde(skip_serializing_if = "str::is_empty")]
    system: &'a str,
    stream: bool,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider with default timeout and retries
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3", "mistral")
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::from_config(&OllamaConfig {
            endpoint: endpoint.into(),
            model: model.into(),
            ..OllamaConfig::default()
        })
    }

    /// Create a provider from configuration
    pub fn from_config(config: &OllamaConfig) -> Result<Self, LlmError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            client,
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
        })
    }

    /// Create a new Ollama provider at `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Generate text for a raw prompt and optional system instructions
    ///
    /// # Errors
    ///
    /// - [`LlmError::ModelNotAvailable`] when Ollama does not know the model
    /// - [`LlmError::Timeout`] when a request exceeds the timeout
    /// - [`LlmError::Communication`] when Ollama is unreachable after retries
    /// - [`LlmError::InvalidResponse`] when the response cannot be parsed
    pub async fn complete(&self, system: &str, prompt: String) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);
        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .json::<OllamaGenerateResponse>()
                            .await
                            .map(|r| r.response)
                            .map_err(|e| {
                                LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                            });
                    }
                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    }
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    last_error = Some(LlmError::Communication(format!(
                        "HTTP {}: {}",
                        status, error_text
                    )));
                }
                Err(e) if e.is_timeout() => {
                    return Err(LlmError::Timeout(self.timeout_secs));
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("Ollama attempt {} failed, retrying in {:?}", attempts, delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

impl TextGenerator for OllamaProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &Prompt) -> Result<String, LlmError> {
        debug!(
            "Generating with '{}' ({} context lines)",
            self.model,
            prompt.context.len()
        );
        self.complete(&prompt.system, prompt.user_text()).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
