//! Contraindication checker facade

use crate::config::SafetyConfig;
use crate::error::SafetyError;
use crate::extract::extract_mentions;
use crate::lookup::find_contraindications;
use crate::resolve::resolve_patient_conditions;
use medrag_domain::traits::GraphStore;
use medrag_domain::{AliasDictionary, SafetyCheckResult};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Runs mention extraction, condition resolution and rule lookup for a question
///
/// The checker holds no per-question state; one instance can serve many
/// concurrent questions.
pub struct ContraindicationChecker<G>
where
    G: GraphStore,
{
    graph: Arc<G>,
    aliases: Arc<AliasDictionary>,
    config: SafetyConfig,
}

impl<G> ContraindicationChecker<G>
where
    G: GraphStore + Send + Sync,
{
    /// Create a new checker
    pub fn new(graph: Arc<G>, aliases: Arc<AliasDictionary>, config: SafetyConfig) -> Self {
        Self {
            graph,
            aliases,
            config,
        }
    }

    /// Shared alias dictionary
    pub fn aliases(&self) -> &Arc<AliasDictionary> {
        &self.aliases
    }

    /// Checker configuration
    pub fn config(&self) -> &SafetyConfig {
        &self.config
    }

    /// Check a patient's question for contraindicated drug mentions
    ///
    /// Conditions are resolved even when the question names no drug; the rule
    /// query is skipped in that case. Every graph call is bounded by the
    /// configured timeout.
    ///
    /// # Errors
    ///
    /// - [`SafetyError::NotFound`] for an unknown patient identifier
    /// - [`SafetyError::GraphUnavailable`] when a graph call fails or times out
    pub async fn check(
        &self,
        patient_id: &str,
        question: &str,
    ) -> Result<SafetyCheckResult, SafetyError> {
        let drug_mentions = extract_mentions(question, self.aliases.drugs());
        debug!("Question mentions {} drug(s)", drug_mentions.len());

        let patient_conditions = bounded(
            self.config.graph_timeout(),
            "condition lookup",
            resolve_patient_conditions(patient_id, self.aliases.conditions(), self.graph.as_ref()),
        )
        .await?;

        let matched_rules = if drug_mentions.is_empty() {
            Vec::new()
        } else {
            bounded(
                self.config.graph_timeout(),
                "rule lookup",
                find_contraindications(
                    &drug_mentions,
                    &patient_conditions,
                    &self.aliases,
                    self.graph.as_ref(),
                ),
            )
            .await?
        };

        let result = SafetyCheckResult::new(matched_rules, drug_mentions, patient_conditions);
        info!(
            "Safety check for '{}': {} rule(s), {} drug(s), {} condition(s)",
            patient_id,
            result.matched_rules.len(),
            result.drug_mentions.len(),
            result.patient_conditions.len()
        );
        Ok(result)
    }
}

async fn bounded<T, F>(limit: Duration, operation: &str, fut: F) -> Result<T, SafetyError>
where
    F: Future<Output = Result<T, SafetyError>>,
{
    timeout(limit, fut).await.map_err(|_| {
        warn!("Graph {} timed out after {:?}", operation, limit);
        SafetyError::GraphUnavailable(format!("{} timed out after {:?}", operation, limit))
    })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::builtin_aliases;
    use medrag_domain::CanonicalTerm;
    use medrag_graph::InMemoryGraph;

    fn checker(graph: InMemoryGraph, config: SafetyConfig) -> ContraindicationChecker<InMemoryGraph> {
        ContraindicationChecker::new(
            Arc::new(graph),
            Arc::new(builtin_aliases().unwrap()),
            config,
        )
    }

    fn heart_patient() -> InMemoryGraph {
        InMemoryGraph::new()
            .with_patient("patient-1", ["Heart Failure", "Chronic Kidney Disease"])
            .with_rule("ibuprofen", "CONTRAINDICATED_IN", "heart_failure", "causes fluid retention")
    }

    #[tokio::test]
    async fn test_check_finds_rule() {
        let checker = checker(heart_patient(), SafetyConfig::default());
        let result = checker.check("patient-1", "Can I take Advil for my back?").await.unwrap();

        assert!(result.has_warnings());
        assert_eq!(result.matched_rules.len(), 1);
        assert!(result.drug_mentions.contains(&CanonicalTerm::new("ibuprofen")));
        assert!(result.patient_conditions.contains(&CanonicalTerm::new("chronic_kidney_disease")));
    }

    #[tokio::test]
    async fn test_no_drug_skips_rule_query() {
        let graph = Arc::new(heart_patient());
        let checker = ContraindicationChecker::new(
            graph.clone(),
            Arc::new(builtin_aliases().unwrap()),
            SafetyConfig::default(),
        );
        let result = checker.check("patient-1", "Should I exercise more?").await.unwrap();

        assert!(!result.has_warnings());
        assert_eq!(result.patient_conditions.len(), 2);
        assert_eq!(graph.condition_query_count(), 1);
        assert_eq!(graph.rule_query_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_patient() {
        let checker = checker(heart_patient(), SafetyConfig::default());
        let result = checker.check("patient-404", "Can I take ibuprofen?").await;
        assert_eq!(result, Err(SafetyError::NotFound("patient-404".to_string())));
    }

    #[tokio::test]
    async fn test_unavailable_graph_is_not_safe() {
        let graph = heart_patient();
        graph.set_unavailable(true);
        let checker = checker(graph, SafetyConfig::default());

        let err = checker.check("patient-1", "Can I take ibuprofen?").await.unwrap_err();
        assert!(err.is_unverified());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_graph_times_out() {
        let graph = heart_patient().with_latency(Duration::from_secs(30));
        let config = SafetyConfig {
            graph_timeout_secs: 1,
            ..SafetyConfig::default()
        };
        let checker = checker(graph, config);

        let err = checker.check("patient-1", "Can I take ibuprofen?").await.unwrap_err();
        assert!(matches!(err, SafetyError::GraphUnavailable(ref msg) if msg.contains("timed out")));
    }
}
