//! In-memory graph store
//!
//! Holds patients, rules and context rows in plain maps. Query counters and
//! an availability switch let tests assert on store traffic and failure
//! handling.

use crate::GraphError;
use medrag_domain::traits::GraphStore;
use medrag_domain::{normalize, ContextTriple, RuleQuery, RuleRecord};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

/// Deterministic in-process [`GraphStore`]
///
/// Matching mirrors the Neo4j store: rule rows match when their drug and
/// condition names, compared case-insensitively, appear among the query's
/// surface forms and their relation kind is requested.
///
/// # Examples
///
/// ```
/// use medrag_graph::InMemoryGraph;
///
/// let graph = InMemoryGraph::new()
///     .with_patient("patient-1", ["Asthma"])
///     .with_rule("propranolol", "WORSENS", "asthma", "bronchospasm");
///
/// assert_eq!(graph.rule_query_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryGraph {
    patients: BTreeMap<String, Vec<String>>,
    rules: Vec<RuleRecord>,
    context: BTreeMap<String, Vec<ContextTriple>>,
    latency: Option<Duration>,
    unavailable: AtomicBool,
    condition_queries: AtomicUsize,
    rule_queries: AtomicUsize,
    context_queries: AtomicUsize,
}

impl InMemoryGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a patient subgraph with its condition names
    pub fn with_patient<I, S>(mut self, patient_id: impl Into<String>, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patients
            .insert(patient_id.into(), conditions.into_iter().map(Into::into).collect());
        self
    }

    /// Add a drug → condition relationship
    ///
    /// An empty reason is stored as no reason.
    pub fn with_rule(mut self, drug: &str, relation: &str, condition: &str, reason: &str) -> Self {
        let reason = (!reason.is_empty()).then(|| reason.to_string());
        self.rules.push(RuleRecord::new(drug, relation, condition, reason));
        self
    }

    /// Add context rows for a patient subgraph
    pub fn with_context<I>(mut self, patient_id: impl Into<String>, triples: I) -> Self
    where
        I: IntoIterator<Item = ContextTriple>,
    {
        self.context.entry(patient_id.into()).or_default().extend(triples);
        self
    }

    /// Delay every query by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every subsequent query fail (or succeed again)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of condition queries issued
    pub fn condition_query_count(&self) -> usize {
        self.condition_queries.load(Ordering::SeqCst)
    }

    /// Number of contraindication queries issued
    pub fn rule_query_count(&self) -> usize {
        self.rule_queries.load(Ordering::SeqCst)
    }

    /// Number of context queries issued
    pub fn context_query_count(&self) -> usize {
        self.context_queries.load(Ordering::SeqCst)
    }

    async fn enter(&self, counter: &AtomicUsize) -> Result<(), GraphError> {
        counter.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(GraphError::Unavailable("in-memory graph marked unavailable".to_string()));
        }
        Ok(())
    }
}

impl GraphStore for InMemoryGraph {
    type Error = GraphError;

    async fn patient_conditions(&self, patient_id: &str) -> Result<Option<Vec<String>>, GraphError> {
        self.enter(&self.condition_queries).await?;
        Ok(self.patients.get(patient_id).cloned())
    }

    async fn contraindications(&self, query: &RuleQuery) -> Result<Vec<RuleRecord>, GraphError> {
        self.enter(&self.rule_queries).await?;

        let drugs: HashSet<String> = query.drug_names.iter().map(|n| normalize(n)).collect();
        let conditions: HashSet<String> =
            query.condition_names.iter().map(|n| normalize(n)).collect();
        let relations: HashSet<String> =
            query.relations.iter().map(|r| r.to_uppercase()).collect();

        let rows: Vec<RuleRecord> = self
            .rules
            .iter()
            .filter(|rule| relations.contains(&rule.relation.to_uppercase()))
            .filter(|rule| drugs.contains(&normalize(&rule.drug)))
            .filter(|rule| conditions.contains(&normalize(&rule.condition)))
            .cloned()
            .collect();

        debug!("In-memory rule query matched {} of {} rows", rows.len(), self.rules.len());
        Ok(rows)
    }

    async fn subgraph_context(
        &self,
        patient_id: &str,
        limit: usize,
    ) -> Result<Vec<ContextTriple>, GraphError> {
        self.enter(&self.context_queries).await?;
        Ok(self
            .context
            .get(patient_id)
            .map(|rows| rows.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> InMemoryGraph {
        InMemoryGraph::new()
            .with_patient("p1", ["Heart Failure", "Gout"])
            .with_rule("Ibuprofen", "CONTRAINDICATED_IN", "Heart Failure", "fluid retention")
            .with_rule("ibuprofen", "SAFE_FOR", "gout", "")
            .with_rule("naproxen", "worsens", "heart failure", "")
            .with_context(
                "p1",
                vec![
                    ContextTriple::new("Patient", "HAS_CONDITION", "Heart Failure"),
                    ContextTriple::new("Patient", "TAKES", "Furosemide"),
                ],
            )
    }

    #[tokio::test]
    async fn test_patient_conditions() {
        let graph = graph();
        assert_eq!(
            graph.patient_conditions("p1").await.unwrap(),
            Some(vec!["Heart Failure".to_string(), "Gout".to_string()])
        );
        assert_eq!(graph.patient_conditions("nobody").await.unwrap(), None);
        assert_eq!(graph.condition_query_count(), 2);
    }

    #[tokio::test]
    async fn test_rule_matching_is_case_insensitive() {
        let graph = graph();
        let query = RuleQuery::new(
            vec!["ibuprofen".into(), "naproxen".into()],
            vec!["heart failure".into(), "gout".into()],
        );
        let rows = graph.contraindications(&query).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].reason.as_deref(), Some("fluid retention"));
        assert_eq!(rows[1].reason, None);
        assert!(rows.iter().all(|r| r.relation != "SAFE_FOR"));
    }

    #[tokio::test]
    async fn test_context_limit() {
        let graph = graph();
        assert_eq!(graph.subgraph_context("p1", 1).await.unwrap().len(), 1);
        assert_eq!(graph.subgraph_context("p1", 100).await.unwrap().len(), 2);
        assert!(graph.subgraph_context("p2", 100).await.unwrap().is_empty());
        assert_eq!(graph.context_query_count(), 3);
    }

    #[tokio::test]
    async fn test_unavailable() {
        let graph = graph();
        graph.set_unavailable(true);
        assert!(matches!(
            graph.patient_conditions("p1").await,
            Err(GraphError::Unavailable(_))
        ));

        graph.set_unavailable(false);
        assert!(graph.patient_conditions("p1").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency() {
        let graph = graph().with_latency(Duration::from_secs(5));
        let start = tokio::time::Instant::now();
        graph.patient_conditions("p1").await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}
