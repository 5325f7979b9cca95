//! Post-generation safety gate

use crate::config::{GateConfig, PhraseMatch};
use crate::extract::extract_mentions;
use crate::matching::contains_word;
use medrag_domain::{normalize, AliasDictionary, GateVerdict, GateViolation, SafetyCheckResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Validates generated answers against the safety check that preceded them
///
/// Evaluation holds no state between calls:
/// 1. No matched rules → pass.
/// 2. Trimmed answer must start with the warning prefix (case-sensitive).
/// 3. No configured hedge phrase may appear (case-insensitive).
/// 4. With `require_rule_citation`, every matched rule's drug must be named.
pub struct SafetyGate {
    config: GateConfig,
    aliases: Arc<AliasDictionary>,
}

impl SafetyGate {
    /// Create a new gate
    pub fn new(config: GateConfig, aliases: Arc<AliasDictionary>) -> Self {
        Self { config, aliases }
    }

    /// The gate configuration
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Evaluate an answer
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use medrag_domain::{AliasDictionary, SafetyCheckResult};
    /// use medrag_safety::{GateConfig, SafetyGate};
    ///
    /// let gate = SafetyGate::new(GateConfig::default(), Arc::new(AliasDictionary::default()));
    /// let verdict = gate.validate("Sure, anytime!", &SafetyCheckResult::default());
    /// assert!(verdict.passed);
    /// ```
    pub fn validate(&self, answer_text: &str, check: &SafetyCheckResult) -> GateVerdict {
        if !check.has_warnings() {
            return GateVerdict::pass("no contraindications to enforce");
        }

        if !answer_text.trim().starts_with(&self.config.warning_prefix) {
            warn!("Answer rejected: missing '{}' prefix", self.config.warning_prefix);
            return GateVerdict::fail(
                GateViolation::MissingWarningPrefix,
                format!(
                    "answer must begin with '{}' when {} contraindication rule(s) apply",
                    self.config.warning_prefix,
                    check.matched_rules.len()
                ),
            );
        }

        if let Some(phrase) = self.find_hedge(answer_text) {
            warn!("Answer rejected: hedge phrase '{}'", phrase);
            return GateVerdict::fail(
                GateViolation::NegationDetected,
                format!("hedge phrase '{}' undermines the warning", phrase),
            );
        }

        if self.config.require_rule_citation {
            let named = extract_mentions(answer_text, self.aliases.drugs());
            if let Some(rule) = check
                .matched_rules
                .iter()
                .find(|rule| !named.contains(&rule.drug))
            {
                warn!("Answer rejected: rule for '{}' not cited", rule.drug);
                return GateVerdict::fail(
                    GateViolation::UncitedRule,
                    format!("answer does not mention {} ({})", rule.drug, rule.directive()),
                );
            }
        }

        debug!("Answer passed gate with {} rule(s)", check.matched_rules.len());
        GateVerdict::pass(format!(
            "warning present for {} rule(s)",
            check.matched_rules.len()
        ))
    }

    /// First configured hedge phrase found in the answer
    fn find_hedge(&self, answer_text: &str) -> Option<&str> {
        let text = normalize(answer_text);
        self.config
            .hedge_phrases
            .iter()
            .map(String::as_str)
            .find(|phrase| {
                let phrase = normalize(phrase);
                match self.config.phrase_match {
                    PhraseMatch::Substring => text.contains(&phrase),
                    PhraseMatch::WordBoundary => contains_word(&text, &phrase),
                }
            })
    }
}
