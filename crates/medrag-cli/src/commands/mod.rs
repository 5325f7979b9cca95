//! Command implementations.

pub mod aliases;
pub mod ask;
pub mod check;
pub mod config;

pub use self::aliases::execute_aliases;
pub use self::ask::execute_ask;
pub use self::check::execute_check;
pub use self::config::execute_config;

use crate::config::Config;
use crate::error::Result;
use medrag_graph::Neo4jStore;
use medrag_llm::OllamaProvider;
use medrag_pipeline::AnswerPipeline;
use std::sync::Arc;
use tracing::debug;

/// Pipeline over the configured Neo4j store and Ollama model.
pub fn build_pipeline(
    config: &Config,
    model: Option<&str>,
) -> Result<AnswerPipeline<Neo4jStore, OllamaProvider>> {
    let aliases = Arc::new(config.aliases()?);
    let graph = Arc::new(Neo4jStore::new(config.neo4j.clone())?);

    let mut ollama = config.ollama.clone();
    if let Some(model) = model {
        ollama.model = model.to_string();
    }
    let generator = Arc::new(OllamaProvider::from_config(&ollama)?);
    debug!(graph = %config.neo4j.url, model = %ollama.model, "Pipeline built");

    Ok(AnswerPipeline::new(
        graph,
        generator,
        aliases,
        config.safety.clone(),
        config.pipeline.clone(),
    ))
}
