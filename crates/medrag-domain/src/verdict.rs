//! Result of the post-generation safety gate

use std::fmt;

/// Which gate rule an answer violated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateViolation {
    /// Answer does not open with the required warning prefix
    MissingWarningPrefix,

    /// Answer contains a hedge phrase that undermines the warning
    NegationDetected,

    /// Answer does not mention a drug from a matched rule
    UncitedRule,
}

impl GateViolation {
    /// Get the violation name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            GateViolation::MissingWarningPrefix => "missing_warning_prefix",
            GateViolation::NegationDetected => "negation_detected",
            GateViolation::UncitedRule => "uncited_rule",
        }
    }
}

impl fmt::Display for GateViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict of one gate evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateVerdict {
    /// Whether the answer may be returned as-is
    pub passed: bool,

    /// The violated rule when the answer was rejected
    pub violated_rule: Option<GateViolation>,

    /// Human-readable explanation
    pub detail: String,
}

impl GateVerdict {
    /// A passing verdict
    pub fn pass(detail: impl Into<String>) -> Self {
        Self {
            passed: true,
            violated_rule: None,
            detail: detail.into(),
        }
    }

    /// A failing verdict for the given violation
    pub fn fail(violation: GateViolation, detail: impl Into<String>) -> Self {
        Self {
            passed: false,
            violated_rule: Some(violation),
            detail: detail.into(),
        }
    }
}
