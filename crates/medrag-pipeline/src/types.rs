//! Request and response types for answering

use medrag_domain::{GateVerdict, QuestionId, SafetyCheckResult};
use std::fmt;

/// A patient's question
#[derive(Debug, Clone)]
pub struct AnswerRequest {
    /// Patient subgraph identifier
    pub patient_id: String,

    /// Free-text question
    pub question: String,
}

impl AnswerRequest {
    /// Create a new request
    pub fn new(patient_id: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            question: question.into(),
        }
    }
}

/// How the returned text was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The first generated answer passed the gate
    Accepted,

    /// A regenerated answer passed the gate
    Regenerated,

    /// Generated text was rejected or unavailable; the rule-citing template was used
    Fallback,
}

impl AnswerOutcome {
    /// Get the outcome name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerOutcome::Accepted => "accepted",
            AnswerOutcome::Regenerated => "regenerated",
            AnswerOutcome::Fallback => "fallback",
        }
    }
}

impl fmt::Display for AnswerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final answer to a question
#[derive(Debug, Clone)]
pub struct Answer {
    /// Identifier used in logs for this question
    pub question_id: QuestionId,

    /// Text to show
    pub text: String,

    /// How the text was obtained
    pub outcome: AnswerOutcome,

    /// Safety check the answer was gated against
    pub check: SafetyCheckResult,

    /// One verdict per generated answer, in order
    pub verdicts: Vec<GateVerdict>,

    /// Model that generated the candidates
    pub model: String,
}
