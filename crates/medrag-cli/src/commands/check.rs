//! Check command implementation.

use super::build_pipeline;
use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use medrag_domain::traits::{GraphStore, TextGenerator};
use medrag_pipeline::{AnswerPipeline, AnswerRequest};

/// Execute the check command.
pub async fn execute_check(args: CheckArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let pipeline = build_pipeline(config, None)?;
    let output = check_with(&pipeline, AnswerRequest::new(args.patient, args.question), formatter).await?;
    println!("{}", output);
    Ok(())
}

/// Run the safety check without generating and format the result.
pub async fn check_with<G, L>(
    pipeline: &AnswerPipeline<G, L>,
    request: AnswerRequest,
    formatter: &Formatter,
) -> Result<String>
where
    G: GraphStore + Send + Sync,
    L: TextGenerator + Send + Sync,
{
    let check = pipeline.check(&request).await?;
    formatter.format_check(&check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::error::CliError;
    use medrag_graph::InMemoryGraph;
    use medrag_llm::MockProvider;
    use medrag_pipeline::{PipelineConfig, PipelineError};
    use medrag_safety::{builtin_aliases, SafetyConfig, SafetyError};
    use std::sync::Arc;

    fn pipeline(graph: Arc<InMemoryGraph>, llm: MockProvider) -> AnswerPipeline<InMemoryGraph, MockProvider> {
        AnswerPipeline::new(
            graph,
            Arc::new(llm),
            Arc::new(builtin_aliases().unwrap()),
            SafetyConfig::default(),
            PipelineConfig::default(),
        )
    }

    fn graph() -> Arc<InMemoryGraph> {
        Arc::new(
            InMemoryGraph::new()
                .with_patient("p1", ["CHF", "asthma"])
                .with_rule("ibuprofen", "CONTRAINDICATED_IN", "heart_failure", "fluid retention")
                .with_rule("naproxen", "WORSENS", "asthma", "bronchospasm"),
        )
    }

    #[tokio::test]
    async fn test_check_reports_rules_without_generating() {
        let llm = MockProvider::new("unused");
        let pipeline = pipeline(graph(), llm.clone());
        let formatter = Formatter::new(OutputFormat::Json, false);

        let output = check_with(&pipeline, AnswerRequest::new("p1", "Are NSAIDs ok?"), &formatter)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let rules = value["matched_rules"].as_array().unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0]["drug"], "ibuprofen");
        assert_eq!(rules[1]["relation"], "WORSENS");
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_graph_outage_surfaces() {
        let graph = graph();
        graph.set_unavailable(true);
        let pipeline = pipeline(graph, MockProvider::new("unused"));
        let formatter = Formatter::new(OutputFormat::Table, false);

        let result = check_with(&pipeline, AnswerRequest::new("p1", "advil?"), &formatter).await;
        assert!(matches!(
            result,
            Err(CliError::Pipeline(PipelineError::Safety(SafetyError::GraphUnavailable(_))))
        ));
    }
}
