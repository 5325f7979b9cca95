//! Contraindication rule lookup

use crate::error::SafetyError;
use medrag_domain::traits::GraphStore;
use medrag_domain::{
    AliasDictionary, CanonicalTerm, ContraindicationRule, Relation, RuleQuery, RuleRecord,
};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Contraindication rules between the given drugs and conditions
///
/// Returns an empty list without querying the store when either set is
/// empty. Otherwise issues one query over every surface form of both sets,
/// maps the returned rows back to canonical terms, drops rows outside the
/// input sets or with unenforced relation kinds, deduplicates, and sorts by
/// (drug, relation, condition).
///
/// # Errors
///
/// [`SafetyError::GraphUnavailable`] when the store query fails. Callers must
/// not treat this as "no contraindications".
pub async fn find_contraindications<G: GraphStore>(
    drugs: &BTreeSet<CanonicalTerm>,
    conditions: &BTreeSet<CanonicalTerm>,
    aliases: &AliasDictionary,
    graph: &G,
) -> Result<Vec<ContraindicationRule>, SafetyError> {
    if drugs.is_empty() || conditions.is_empty() {
        debug!("Nothing to check: {} drugs, {} conditions", drugs.len(), conditions.len());
        return Ok(Vec::new());
    }

    let query = RuleQuery::new(
        aliases.drugs().surface_forms(drugs),
        aliases.conditions().surface_forms(conditions),
    );
    let records = graph
        .contraindications(&query)
        .await
        .map_err(|e| SafetyError::GraphUnavailable(e.to_string()))?;

    let rules = rules_from_records(&records, drugs, conditions, aliases);
    info!("Found {} contraindication rules ({} raw rows)", rules.len(), records.len());
    Ok(rules)
}

fn rules_from_records(
    records: &[RuleRecord],
    drugs: &BTreeSet<CanonicalTerm>,
    conditions: &BTreeSet<CanonicalTerm>,
    aliases: &AliasDictionary,
) -> Vec<ContraindicationRule> {
    let mut rules = Vec::new();

    for record in records {
        let Some(relation) = Relation::parse(&record.relation) else {
            debug!("Ignoring relation kind '{}'", record.relation);
            continue;
        };
        let reason = record.reason.as_deref().unwrap_or("").trim().to_string();

        for drug in resolve_within(&record.drug, aliases.drugs().owners(&record.drug), drugs) {
            let owners = aliases.conditions().owners(&record.condition);
            for condition in resolve_within(&record.condition, owners, conditions) {
                rules.push(ContraindicationRule::new(
                    drug.clone(),
                    relation,
                    condition,
                    reason.clone(),
                ));
            }
        }
    }

    // Stable: among equal keys, rows with a reason come first in row order
    rules.sort_by(|a, b| {
        a.key()
            .cmp(&b.key())
            .then_with(|| a.reason.is_empty().cmp(&b.reason.is_empty()))
    });
    rules.dedup_by(|later, kept| later.key() == kept.key());
    rules
}

/// Terms a row name stands for, restricted to the requested set
fn resolve_within(
    name: &str,
    owners: Vec<&CanonicalTerm>,
    wanted: &BTreeSet<CanonicalTerm>,
) -> Vec<CanonicalTerm> {
    if owners.is_empty() {
        return wanted.iter().filter(|term| term.is_named(name)).cloned().collect();
    }
    owners
        .into_iter()
        .filter(|term| wanted.contains(*term))
        .cloned()
        .collect()
}
