//! medrag Graph Store Layer
//!
//! Implementations of the `GraphStore` trait from `medrag-domain`.
//!
//! # Stores
//!
//! - `Neo4jStore`: Neo4j over its HTTP transactional endpoint
//! - `InMemoryGraph`: deterministic in-process graph for tests and demos
//!
//! # Examples
//!
//! ```
//! use medrag_domain::traits::GraphStore;
//! use medrag_graph::InMemoryGraph;
//!
//! # async fn example() {
//! let graph = InMemoryGraph::new()
//!     .with_patient("patient-1", ["Heart Failure"])
//!     .with_rule("ibuprofen", "CONTRAINDICATED_IN", "heart failure", "fluid retention");
//!
//! let conditions = graph.patient_conditions("patient-1").await.unwrap();
//! assert_eq!(conditions, Some(vec!["Heart Failure".to_string()]));
//! # }
//! ```

#![warn(missing_docs)]

pub mod memory;
pub mod neo4j;

use thiserror::Error;

pub use memory::InMemoryGraph;
pub use neo4j::{Neo4jConfig, Neo4jStore};

/// Errors that can occur during graph store operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// Network or HTTP-level failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// The database rejected a query
    #[error("Query failed: {0}")]
    Query(String),

    /// Response body could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Store is offline
    #[error("Graph store unavailable: {0}")]
    Unavailable(String),

    /// Invalid store configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
