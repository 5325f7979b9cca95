//! Scripted text generator for tests

use crate::LlmError;
use medrag_domain::traits::TextGenerator;
use medrag_domain::Prompt;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Scripted {
    Text(String),
    Error,
}

impl Scripted {
    fn into_result(self) -> Result<String, LlmError> {
        match self {
            Scripted::Text(text) => Ok(text),
            Scripted::Error => Err(LlmError::Other("Mock error".to_string())),
        }
    }
}

#[derive(Debug, Default)]
struct Script {
    queued: VecDeque<Scripted>,
    by_question: HashMap<String, Scripted>,
    prompts: Vec<Prompt>,
}

/// Mock text generator for deterministic testing
///
/// Responses are chosen in this order: queued responses (first in, first
/// out), then a response registered for the prompt's question, then the
/// default response. Every prompt is recorded. Clones share state.
///
/// # Examples
///
/// ```
/// use medrag_domain::traits::TextGenerator;
/// use medrag_domain::Prompt;
/// use medrag_llm::MockProvider;
///
/// # async fn example() {
/// let provider = MockProvider::new("fallback text");
/// provider.queue_response("first answer");
///
/// let prompt = Prompt::new("", vec![], "Can I take ibuprofen?");
/// assert_eq!(provider.generate(&prompt).await.unwrap(), "first answer");
/// assert_eq!(provider.generate(&prompt).await.unwrap(), "fallback text");
/// assert_eq!(provider.call_count(), 2);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    model: String,
    delay: Option<Duration>,
    script: Arc<Mutex<Script>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            model: "mock".to_string(),
            delay: None,
            script: Arc::new(Mutex::new(Script::default())),
        }
    }

    /// Set the reported model name
    pub fn with_model_name(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Delay every generation by `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Add a specific response for a given question
    pub fn add_response(&mut self, question: impl Into<String>, response: impl Into<String>) {
        self.lock()
            .by_question
            .insert(question.into(), Scripted::Text(response.into()));
    }

    /// Configure to return an error for a specific question
    pub fn add_error(&mut self, question: impl Into<String>) {
        self.lock().by_question.insert(question.into(), Scripted::Error);
    }

    /// Queue a response for the next unanswered call
    pub fn queue_response(&self, response: impl Into<String>) {
        self.lock().queued.push_back(Scripted::Text(response.into()));
    }

    /// Queue an error for the next unanswered call
    pub fn queue_error(&self) {
        self.lock().queued.push_back(Scripted::Error);
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.lock().prompts.len()
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<Prompt> {
        self.lock().prompts.clone()
    }

    /// Reset the call count and recorded prompts
    pub fn reset_call_count(&self) {
        self.lock().prompts.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn respond(&self, prompt: &Prompt) -> Result<String, LlmError> {
        let mut script = self.lock();
        script.prompts.push(prompt.clone());

        if let Some(next) = script.queued.pop_front() {
            return next.into_result();
        }
        match script.by_question.get(&prompt.question) {
            Some(scripted) => scripted.clone().into_result(),
            None => Ok(self.default_response.clone()),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl TextGenerator for MockProvider {
    type Error = LlmError;

    async fn generate(&self, prompt: &Prompt) -> Result<String, LlmError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.respond(prompt)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(question: &str) -> Prompt {
        Prompt::new("system", vec!["context".to_string()], question)
    }

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate(&prompt("any question")).await;
        assert_eq!(result.unwrap(), "Test response");
        assert_eq!(provider.model_name(), "mock");
    }

    #[tokio::test]
    async fn test_mock_provider_specific_responses() {
        let mut provider = MockProvider::default();
        provider.add_response("hello", "world");
        provider.add_response("foo", "bar");

        assert_eq!(provider.generate(&prompt("hello")).await.unwrap(), "world");
        assert_eq!(provider.generate(&prompt("foo")).await.unwrap(), "bar");
        assert_eq!(
            provider.generate(&prompt("unknown")).await.unwrap(),
            "Default mock response"
        );
    }

    #[tokio::test]
    async fn test_queue_takes_precedence() {
        let mut provider = MockProvider::new("default");
        provider.add_response("q", "by question");
        provider.queue_response("first");
        provider.queue_error();

        assert_eq!(provider.generate(&prompt("q")).await.unwrap(), "first");
        assert!(provider.generate(&prompt("q")).await.is_err());
        assert_eq!(provider.generate(&prompt("q")).await.unwrap(), "by question");
    }

    #[tokio::test]
    async fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");
        assert_eq!(provider.call_count(), 0);

        provider.generate(&prompt("one")).await.unwrap();
        provider.generate(&prompt("two")).await.unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.prompts()[1].question, "two");

        provider.reset_call_count();
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let mut provider = MockProvider::default();
        provider.add_error("bad question");

        let result = provider.generate(&prompt("bad question")).await;
        assert!(matches!(result, Err(LlmError::Other(_))));
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test").with_model_name("llama3");
        let provider2 = provider1.clone();

        provider1.generate(&prompt("q")).await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
        assert_eq!(provider2.model_name(), "llama3");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay() {
        let provider = MockProvider::new("slow").with_delay(Duration::from_secs(3));
        let start = tokio::time::Instant::now();
        provider.generate(&prompt("q")).await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(3));
    }
}
