//! Deterministic fallback answers

use medrag_domain::SafetyCheckResult;

/// Closing advice appended to every fallback answer
pub const CLINICIAN_ADVICE: &str =
    "Do not take these medications without first talking to your doctor or pharmacist.";

/// Answer returned when no contraindication applies and generation is unavailable
pub const NO_RULES_ANSWER: &str = "No contraindications were found between the medications \
     mentioned and your recorded conditions. Talk to your doctor or pharmacist before starting \
     any new medication.";

/// Rule-citing answer used when generated text cannot be trusted
///
/// Each matched rule is cited verbatim as its directive line, followed by the
/// graph's reason when it has one. The text always begins with `WARNING:`
/// when rules are present.
///
/// # Examples
///
/// ```
/// use medrag_domain::{ContraindicationRule, Relation, SafetyCheckResult};
/// use medrag_safety::fallback_answer;
///
/// let mut check = SafetyCheckResult::default();
/// check.matched_rules.push(ContraindicationRule::new(
///     "ibuprofen", Relation::ContraindicatedIn, "heart_failure", "causes fluid retention",
/// ));
///
/// let answer = fallback_answer(&check);
/// assert!(answer.starts_with("WARNING: IBUPROFEN is CONTRAINDICATED_IN HEART_FAILURE."));
/// assert!(answer.contains("Reason: causes fluid retention."));
/// ```
pub fn fallback_answer(check: &SafetyCheckResult) -> String {
    if !check.has_warnings() {
        return NO_RULES_ANSWER.to_string();
    }

    let mut lines: Vec<String> = check
        .matched_rules
        .iter()
        .map(|rule| {
            let reason = rule.reason.trim().trim_end_matches('.');
            if reason.is_empty() {
                format!("{}.", rule.directive())
            } else {
                format!("{}. Reason: {}.", rule.directive(), reason)
            }
        })
        .collect();
    lines.push(CLINICIAN_ADVICE.to_string());
    lines.join("\n")
}
