//! Context injection of contraindication directives

use medrag_domain::ContraindicationRule;

/// Marker line opening the injected directive block
pub const DIRECTIVE_DELIMITER: &str =
    "======================================================================";

/// Header line of the injected directive block
pub const DIRECTIVE_HEADER: &str = "** CONTRAINDICATION RULES (NON-NEGOTIABLE - MUST FOLLOW) **";

/// Prepend one directive line per rule to the generation context
///
/// With no rules the base context is returned unchanged. Otherwise the
/// result is the delimiter, the header, `rules.len()` directive lines of the
/// form `WARNING: <DRUG> is <RELATION> <CONDITION>`, then the base context in
/// its original order.
///
/// # Examples
///
/// ```
/// use medrag_domain::{ContraindicationRule, Relation};
/// use medrag_safety::build_injected_context;
///
/// let rules = vec![ContraindicationRule::new(
///     "ibuprofen", Relation::ContraindicatedIn, "heart_failure", "",
/// )];
/// let context = build_injected_context(&rules, &["Patient_001 HAS_CONDITION hf".to_string()]);
///
/// assert_eq!(context.len(), 4);
/// assert_eq!(context[2], "WARNING: IBUPROFEN is CONTRAINDICATED_IN HEART_FAILURE");
/// ```
pub fn build_injected_context(
    rules: &[ContraindicationRule],
    base_context: &[String],
) -> Vec<String> {
    if rules.is_empty() {
        return base_context.to_vec();
    }

    let mut context = Vec::with_capacity(rules.len() + 2 + base_context.len());
    context.push(DIRECTIVE_DELIMITER.to_string());
    context.push(DIRECTIVE_HEADER.to_string());
    context.extend(rules.iter().map(ContraindicationRule::directive));
    context.extend(base_context.iter().cloned());
    context
}
