//! Condition resolution for a patient subgraph

use crate::error::SafetyError;
use medrag_domain::traits::GraphStore;
use medrag_domain::{normalize, AliasTable, CanonicalTerm};
use std::collections::BTreeSet;
use tracing::debug;

/// Canonical conditions linked to a patient in the graph
///
/// Each condition name returned by the store is mapped through the condition
/// alias table; names the table does not know pass through in their own
/// normalized form. Issues exactly one read query.
///
/// # Errors
///
/// - [`SafetyError::NotFound`] when the identifier does not exist
/// - [`SafetyError::GraphUnavailable`] when the store query fails
pub async fn resolve_patient_conditions<G: GraphStore>(
    patient_id: &str,
    conditions: &AliasTable,
    graph: &G,
) -> Result<BTreeSet<CanonicalTerm>, SafetyError> {
    let names = graph
        .patient_conditions(patient_id)
        .await
        .map_err(|e| SafetyError::GraphUnavailable(e.to_string()))?
        .ok_or_else(|| SafetyError::NotFound(patient_id.to_string()))?;

    let resolved: BTreeSet<CanonicalTerm> = names
        .iter()
        .filter(|name| !name.trim().is_empty())
        .map(|name| canonicalize_or_pass_through(name, conditions))
        .collect();

    debug!(
        "Resolved {} condition names to {} canonical conditions for '{}'",
        names.len(),
        resolved.len(),
        patient_id
    );
    Ok(resolved)
}

/// The canonical term for `name`, or `name` itself (normalized) when unknown
pub fn canonicalize_or_pass_through(name: &str, table: &AliasTable) -> CanonicalTerm {
    table
        .canonicalize(name)
        .cloned()
        .unwrap_or_else(|| CanonicalTerm::new(normalize(name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::builtin_aliases;
    use medrag_graph::InMemoryGraph;

    #[tokio::test]
    async fn test_conditions_are_canonicalized() {
        let dict = builtin_aliases().unwrap();
        let graph = InMemoryGraph::new()
            .with_patient("patient-1", ["Congestive Heart Failure", "CKD", "Gout"]);

        let conditions = resolve_patient_conditions("patient-1", dict.conditions(), &graph)
            .await
            .unwrap();
        let names: Vec<_> = conditions.iter().map(|t| t.as_str()).collect();
        assert_eq!(names, vec!["chronic_kidney_disease", "gout", "heart_failure"]);
        assert_eq!(graph.condition_query_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_patient_is_not_found() {
        let dict = builtin_aliases().unwrap();
        let graph = InMemoryGraph::new();

        let result = resolve_patient_conditions("ghost", dict.conditions(), &graph).await;
        assert_eq!(result, Err(SafetyError::NotFound("ghost".to_string())));
    }

    #[tokio::test]
    async fn test_store_failure_is_graph_unavailable() {
        let dict = builtin_aliases().unwrap();
        let graph = InMemoryGraph::new().with_patient("patient-1", ["asthma"]);
        graph.set_unavailable(true);

        let result = resolve_patient_conditions("patient-1", dict.conditions(), &graph).await;
        assert!(matches!(result, Err(SafetyError::GraphUnavailable(_))));
    }

    #[tokio::test]
    async fn test_patient_without_conditions() {
        let dict = builtin_aliases().unwrap();
        let graph = InMemoryGraph::new().with_patient("patient-2", Vec::<String>::new());

        let conditions = resolve_patient_conditions("patient-2", dict.conditions(), &graph)
            .await
            .unwrap();
        assert!(conditions.is_empty());
    }

    #[test]
    fn test_pass_through_is_normalized() {
        let dict = builtin_aliases().unwrap();
        let term = canonicalize_or_pass_through("  Atrial   Fibrillation ", dict.conditions());
        assert_eq!(term.as_str(), "atrial fibrillation");
    }
}
