//! medrag Answer Pipeline
//!
//! Safety-gated question answering over a patient's knowledge subgraph.
//!
//! # Architecture
//!
//! ```text
//! question → safety check → context + directives → LLM → gate ─┬→ answer
//!                 │                                   ↑        │
//!                 └→ error (no generation)            └ retry ←┤
//!                                                              └→ rule-citing fallback
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use medrag_graph::InMemoryGraph;
//! use medrag_llm::MockProvider;
//! use medrag_pipeline::{AnswerPipeline, AnswerRequest, PipelineConfig};
//! use medrag_safety::{builtin_aliases, SafetyConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = AnswerPipeline::new(
//!     Arc::new(InMemoryGraph::new().with_patient("p1", ["Asthma"])),
//!     Arc::new(MockProvider::new("Rest and fluids.")),
//!     Arc::new(builtin_aliases()?),
//!     SafetyConfig::default(),
//!     PipelineConfig::default(),
//! );
//!
//! let answer = pipeline.answer(AnswerRequest::new("p1", "How do I treat a cold?")).await?;
//! println!("[{}] {}", answer.outcome, answer.text);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod pipeline;
mod prompt;
mod types;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pipeline::AnswerPipeline;
pub use prompt::{base_context, CONDITIONS_HEADER, CONDITIONS_RULE};
pub use types::{Answer, AnswerOutcome, AnswerRequest};
