//! Safety check error types

use thiserror::Error;

/// Errors that can occur while checking a question for contraindications
///
/// Gate rejections are not errors; they are reported as a
/// [`GateVerdict`](medrag_domain::GateVerdict).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SafetyError {
    /// The graph store could not be reached, failed the query or timed out
    #[error("Graph unavailable: {0}")]
    GraphUnavailable(String),

    /// The patient identifier does not exist in the graph
    #[error("No matching record for patient '{0}'")]
    NotFound(String),

    /// Alias or gate configuration is invalid
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SafetyError {
    /// Whether the failure means safety could not be verified
    pub fn is_unverified(&self) -> bool {
        matches!(self, SafetyError::GraphUnavailable(_))
    }
}
