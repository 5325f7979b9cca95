//! medrag Safety
//!
//! Deterministic contraindication checking around an LLM answer.
//!
//! # Architecture
//!
//! ```text
//! question ─→ extract_mentions ─┐
//! patient  ─→ resolve_patient_conditions ─┤→ find_contraindications ─→ SafetyCheckResult
//!                                                                        │
//! base context ─→ build_injected_context ←───────────────────────────────┤
//! generated answer ─→ SafetyGate::validate ←─────────────────────────────┘
//! ```
//!
//! Graph failures are errors, never "no contraindications". A gate rejection
//! is a verdict, not an error; callers regenerate or fall back to
//! [`fallback_answer`].
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use medrag_graph::InMemoryGraph;
//! use medrag_safety::{builtin_aliases, ContraindicationChecker, SafetyConfig, SafetyGate};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let aliases = Arc::new(builtin_aliases()?);
//! let graph = Arc::new(InMemoryGraph::new());
//! let config = SafetyConfig::default();
//!
//! let checker = ContraindicationChecker::new(graph, aliases.clone(), config.clone());
//! let check = checker.check("patient-1", "Can I take ibuprofen?").await?;
//!
//! let gate = SafetyGate::new(config.gate, aliases);
//! let verdict = gate.validate("WARNING: avoid ibuprofen.", &check);
//! println!("passed: {}", verdict.passed);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod aliases;
pub mod checker;
pub mod config;
pub mod error;
pub mod extract;
pub mod fallback;
pub mod gate;
pub mod inject;
pub mod lookup;
mod matching;
pub mod resolve;

pub use aliases::{aliases_from_toml, builtin_aliases, load_aliases, BUILTIN_ALIASES};
pub use checker::ContraindicationChecker;
pub use config::{GateConfig, PhraseMatch, SafetyConfig, DEFAULT_HEDGE_PHRASES};
pub use error::SafetyError;
pub use extract::extract_mentions;
pub use fallback::fallback_answer;
pub use gate::SafetyGate;
pub use inject::{build_injected_context, DIRECTIVE_DELIMITER, DIRECTIVE_HEADER};
pub use lookup::find_contraindications;
pub use resolve::{canonicalize_or_pass_through, resolve_patient_conditions};
