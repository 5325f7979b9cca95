//! Generation instructions and base context

use medrag_domain::{ContextTriple, GateVerdict, SafetyCheckResult};

/// Rule framing the patient conditions block
pub const CONDITIONS_RULE: &str = "==================================================";

/// Header of the patient conditions block
pub const CONDITIONS_HEADER: &str = "PATIENT'S MEDICAL CONDITIONS (CHECK CONTRAINDICATIONS!):";

const BASE_INSTRUCTIONS: &str = "You are a medical assistant providing personalized advice \
based on a patient's specific conditions.

INSTRUCTIONS:
1. Identify the patient's medical conditions from the PATIENT'S MEDICAL CONDITIONS section.
2. If the question is about a medication or treatment, check it against those conditions.
3. Keep the answer concise (2-3 paragraphs) in plain language.
4. Be specific about which conditions matter for the question.";

const WARNING_INSTRUCTIONS: &str = "CONTRAINDICATIONS APPLY TO THIS QUESTION.
- Your answer MUST begin with \"WARNING:\".
- State every rule listed under CONTRAINDICATION RULES, naming the medication and the condition.
- Do not soften, qualify or contradict the warnings.";

/// System instructions for the first generation
pub fn system_instructions(check: &SafetyCheckResult) -> String {
    if check.has_warnings() {
        format!("{}\n\n{}", BASE_INSTRUCTIONS, WARNING_INSTRUCTIONS)
    } else {
        BASE_INSTRUCTIONS.to_string()
    }
}

/// System instructions for a regeneration after a gate rejection
pub fn stricter_instructions(check: &SafetyCheckResult, rejected: &GateVerdict) -> String {
    let rule = rejected
        .violated_rule
        .map(|v| v.as_str())
        .unwrap_or("unknown");
    format!(
        "{}\n\nYOUR PREVIOUS ANSWER WAS REJECTED ({}): {}.\n\
         Begin with exactly \"WARNING:\" and restate the contraindication rules plainly, \
         without exceptions or reassurance.",
        system_instructions(check),
        rule,
        rejected.detail
    )
}

/// Conditions block followed by subgraph relationship lines
///
/// The block is omitted when the patient has no conditions.
pub fn base_context(check: &SafetyCheckResult, triples: &[ContextTriple]) -> Vec<String> {
    let mut context = Vec::with_capacity(check.patient_conditions.len() + 2 + triples.len());
    if !check.patient_conditions.is_empty() {
        context.push(CONDITIONS_RULE.to_string());
        context.push(CONDITIONS_HEADER.to_string());
        context.extend(
            check
                .patient_conditions
                .iter()
                .map(|c| format!("  - {}", c.as_phrase())),
        );
        context.push(CONDITIONS_RULE.to_string());
    }
    context.extend(triples.iter().map(ToString::to_string));
    context
}
