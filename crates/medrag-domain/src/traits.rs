//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between the safety logic and
//! infrastructure. Implementations live in `medrag-graph` and `medrag-llm`;
//! tests substitute in-memory doubles.

use crate::prompt::{ContextTriple, Prompt};
use crate::rule::{RuleQuery, RuleRecord};
use std::fmt::Display;
use std::future::Future;

/// Read-only access to the medical knowledge graph
///
/// Implemented by the infrastructure layer (medrag-graph)
pub trait GraphStore {
    /// Error type for store operations
    type Error: Display + Send;

    /// Condition names linked to a patient subgraph
    ///
    /// Returns `Ok(None)` when the identifier does not exist in the graph.
    fn patient_conditions(
        &self,
        patient_id: &str,
    ) -> impl Future<Output = Result<Option<Vec<String>>, Self::Error>> + Send;

    /// Typed drug → condition relationships matching the query
    fn contraindications(
        &self,
        query: &RuleQuery,
    ) -> impl Future<Output = Result<Vec<RuleRecord>, Self::Error>> + Send;

    /// Relationship rows of a patient subgraph, at most `limit`
    fn subgraph_context(
        &self,
        patient_id: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ContextTriple>, Self::Error>> + Send;
}

/// Text generation by a local or remote language model
///
/// Implemented by the infrastructure layer (medrag-llm)
pub trait TextGenerator {
    /// Error type for generation operations
    type Error: Display + Send;

    /// Generate an answer for the prompt
    fn generate(&self, prompt: &Prompt)
        -> impl Future<Output = Result<String, Self::Error>> + Send;

    /// Name of the model behind this generator, for logs and answers
    fn model_name(&self) -> &str;
}
