//! Ask command implementation.

use super::build_pipeline;
use crate::cli::AskArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use medrag_domain::traits::{GraphStore, TextGenerator};
use medrag_pipeline::{AnswerPipeline, AnswerRequest};

/// Execute the ask command.
pub async fn execute_ask(args: AskArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let pipeline = build_pipeline(config, args.model.as_deref())?;
    let output = ask_with(&pipeline, AnswerRequest::new(args.patient, args.question), formatter).await?;
    println!("{}", output);
    Ok(())
}

/// Answer one question with the given pipeline and format the result.
pub async fn ask_with<G, L>(
    pipeline: &AnswerPipeline<G, L>,
    request: AnswerRequest,
    formatter: &Formatter,
) -> Result<String>
where
    G: GraphStore + Send + Sync,
    L: TextGenerator + Send + Sync,
{
    let answer = pipeline.answer(request).await?;
    formatter.format_answer(&answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::error::CliError;
    use medrag_graph::InMemoryGraph;
    use medrag_llm::MockProvider;
    use medrag_pipeline::PipelineConfig;
    use medrag_safety::{builtin_aliases, SafetyConfig};
    use std::sync::Arc;

    fn pipeline(graph: InMemoryGraph, llm: MockProvider) -> AnswerPipeline<InMemoryGraph, MockProvider> {
        AnswerPipeline::new(
            Arc::new(graph),
            Arc::new(llm),
            Arc::new(builtin_aliases().unwrap()),
            SafetyConfig::default(),
            PipelineConfig::default(),
        )
    }

    fn graph() -> InMemoryGraph {
        InMemoryGraph::new()
            .with_patient("p1", ["heart failure"])
            .with_rule("ibuprofen", "CONTRAINDICATED_IN", "heart_failure", "fluid retention")
    }

    #[tokio::test]
    async fn test_unsafe_answer_replaced_in_output() {
        let pipeline = pipeline(graph(), MockProvider::new("Sure, ibuprofen is fine."));
        let formatter = Formatter::new(OutputFormat::Json, false);

        let output = ask_with(&pipeline, AnswerRequest::new("p1", "Can I take Advil?"), &formatter)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["outcome"], "fallback");
        assert!(value["answer"]
            .as_str()
            .unwrap()
            .starts_with("WARNING: IBUPROFEN is CONTRAINDICATED_IN HEART_FAILURE"));
        assert_eq!(value["verdicts"][0]["violated_rule"], "missing_warning_prefix");
    }

    #[tokio::test]
    async fn test_unknown_patient_is_error() {
        let pipeline = pipeline(graph(), MockProvider::new("anything"));
        let formatter = Formatter::new(OutputFormat::Table, false);

        let result = ask_with(&pipeline, AnswerRequest::new("nobody", "Advil?"), &formatter).await;
        assert!(matches!(result, Err(CliError::Pipeline(_))));
    }
}
