//! medrag Domain Layer
//!
//! Value types and collaborator traits for contraindication-checked question
//! answering over a medical knowledge graph. This crate carries no
//! infrastructure: the graph store and the text generator are described here
//! as traits and implemented in `medrag-graph` and `medrag-llm`.
//!
//! ## Key Concepts
//!
//! - **CanonicalTerm**: normalized identity of a drug or condition
//! - **AliasDictionary**: static surface-form tables for drugs and conditions
//! - **ContraindicationRule**: a typed drug → condition relationship read from the graph
//! - **SafetyCheckResult**: per-question outcome of the pre-generation check
//! - **GateVerdict**: per-answer outcome of the post-generation check

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alias;
pub mod check;
pub mod prompt;
pub mod question;
pub mod rule;
pub mod term;
pub mod traits;
pub mod verdict;

// Re-exports for convenience
pub use alias::{AliasDictionary, AliasTable, TermKind};
pub use check::SafetyCheckResult;
pub use prompt::{ContextTriple, Prompt};
pub use question::QuestionId;
pub use rule::{ContraindicationRule, Relation, RuleQuery, RuleRecord};
pub use term::{normalize, CanonicalTerm};
pub use verdict::{GateVerdict, GateViolation};
