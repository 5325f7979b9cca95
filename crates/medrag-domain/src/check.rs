//! Result of the pre-generation safety check

use crate::rule::ContraindicationRule;
use crate::term::CanonicalTerm;
use std::collections::BTreeSet;

/// Outcome of checking one question against one patient
///
/// Created fresh per question and discarded once the answer is final.
/// `has_warnings()` is true exactly when `matched_rules` is non-empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SafetyCheckResult {
    /// Matched rules, sorted by (drug, relation, condition)
    pub matched_rules: Vec<ContraindicationRule>,

    /// Canonical drugs mentioned in the question
    pub drug_mentions: BTreeSet<CanonicalTerm>,

    /// Canonical conditions of the patient
    pub patient_conditions: BTreeSet<CanonicalTerm>,
}

impl SafetyCheckResult {
    /// Create a result from its parts
    pub fn new(
        matched_rules: Vec<ContraindicationRule>,
        drug_mentions: BTreeSet<CanonicalTerm>,
        patient_conditions: BTreeSet<CanonicalTerm>,
    ) -> Self {
        Self {
            matched_rules,
            drug_mentions,
            patient_conditions,
        }
    }

    /// Whether any contraindication rule matched
    pub fn has_warnings(&self) -> bool {
        !self.matched_rules.is_empty()
    }
}
