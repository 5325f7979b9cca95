//! Answer pipeline behaviour against in-memory collaborators

use medrag_domain::{ContextTriple, GateViolation};
use medrag_graph::InMemoryGraph;
use medrag_llm::MockProvider;
use medrag_pipeline::{
    AnswerOutcome, AnswerPipeline, AnswerRequest, PipelineConfig, PipelineError, CONDITIONS_HEADER,
};
use medrag_safety::{builtin_aliases, SafetyConfig, SafetyError};
use std::sync::Arc;
use std::time::Duration;

const GOOD_ANSWER: &str =
    "WARNING: Ibuprofen is contraindicated in heart failure. Please avoid it and ask your doctor.";

fn graph() -> InMemoryGraph {
    InMemoryGraph::new()
        .with_patient("patient-hf", ["Congestive Heart Failure", "Chronic Kidney Disease"])
        .with_rule("ibuprofen", "CONTRAINDICATED_IN", "heart_failure", "causes fluid retention")
        .with_context(
            "patient-hf",
            vec![
                ContextTriple::new("Patient", "HAS_CONDITION", "Congestive Heart Failure"),
                ContextTriple::new("Patient", "TAKES", "Furosemide"),
            ],
        )
}

fn pipeline_with(
    graph: Arc<InMemoryGraph>,
    llm: MockProvider,
    config: PipelineConfig,
) -> AnswerPipeline<InMemoryGraph, MockProvider> {
    AnswerPipeline::new(
        graph,
        Arc::new(llm),
        Arc::new(builtin_aliases().unwrap()),
        SafetyConfig::default(),
        config,
    )
}

fn pipeline(llm: MockProvider) -> AnswerPipeline<InMemoryGraph, MockProvider> {
    pipeline_with(Arc::new(graph()), llm, PipelineConfig::default())
}

fn ibuprofen() -> AnswerRequest {
    AnswerRequest::new("patient-hf", "Can I take ibuprofen for my knee?")
}

#[tokio::test]
async fn test_warned_answer_is_accepted() {
    let llm = MockProvider::new(GOOD_ANSWER);
    let answer = pipeline(llm.clone()).answer(ibuprofen()).await.unwrap();

    assert_eq!(answer.outcome, AnswerOutcome::Accepted);
    assert_eq!(answer.text, GOOD_ANSWER);
    assert_eq!(answer.verdicts.len(), 1);
    assert!(answer.check.has_warnings());
    assert_eq!(answer.model, "mock");

    let prompts = llm.prompts();
    assert_eq!(prompts.len(), 1);
    let context = &prompts[0].context;
    assert!(context
        .iter()
        .any(|line| line == "WARNING: IBUPROFEN is CONTRAINDICATED_IN HEART_FAILURE"));
    assert!(context.iter().any(|line| line == CONDITIONS_HEADER));
    assert!(context.iter().any(|line| line == "Patient TAKES Furosemide"));
    assert!(prompts[0].system.contains("WARNING:"));
}

#[tokio::test]
async fn test_directives_precede_base_context() {
    let llm = MockProvider::new(GOOD_ANSWER);
    pipeline(llm.clone()).answer(ibuprofen()).await.unwrap();

    let context = &llm.prompts()[0].context;
    let directive = context.iter().position(|l| l.starts_with("WARNING:")).unwrap();
    let header = context.iter().position(|l| l == CONDITIONS_HEADER).unwrap();
    assert!(directive < header);
}

#[tokio::test]
async fn test_rejected_answer_is_regenerated() {
    let llm = MockProvider::new(GOOD_ANSWER);
    llm.queue_response("Ibuprofen is fine.");

    let answer = pipeline(llm.clone()).answer(ibuprofen()).await.unwrap();

    assert_eq!(answer.outcome, AnswerOutcome::Regenerated);
    assert_eq!(answer.text, GOOD_ANSWER);
    assert_eq!(
        answer.verdicts[0].violated_rule,
        Some(GateViolation::MissingWarningPrefix)
    );
    assert!(answer.verdicts[1].passed);

    let prompts = llm.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].system.contains("missing_warning_prefix"));
}

#[tokio::test]
async fn test_persistent_rejection_falls_back() {
    let llm = MockProvider::new("WARNING: Ibuprofen is risky, however it may be safe in some cases.");
    let answer = pipeline(llm.clone()).answer(ibuprofen()).await.unwrap();

    assert_eq!(answer.outcome, AnswerOutcome::Fallback);
    assert!(answer
        .text
        .starts_with("WARNING: IBUPROFEN is CONTRAINDICATED_IN HEART_FAILURE."));
    assert!(answer.text.contains("causes fluid retention"));
    assert_eq!(llm.call_count(), 2);
    assert!(answer
        .verdicts
        .iter()
        .all(|v| v.violated_rule == Some(GateViolation::NegationDetected)));
}

#[tokio::test]
async fn test_strict_config_falls_back_without_retry() {
    let llm = MockProvider::new("Ibuprofen is fine.");
    let answer = pipeline_with(Arc::new(graph()), llm.clone(), PipelineConfig::strict())
        .answer(ibuprofen())
        .await
        .unwrap();

    assert_eq!(answer.outcome, AnswerOutcome::Fallback);
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn test_no_warnings_passes_any_text() {
    let llm = MockProvider::new("Sure, anytime!");
    let answer = pipeline(llm)
        .answer(AnswerRequest::new("patient-hf", "Can I take Tylenol?"))
        .await
        .unwrap();

    assert_eq!(answer.outcome, AnswerOutcome::Accepted);
    assert_eq!(answer.text, "Sure, anytime!");
    assert!(!answer.check.has_warnings());
}

#[tokio::test]
async fn test_unavailable_graph_aborts_before_generation() {
    let graph = Arc::new(graph());
    graph.set_unavailable(true);
    let llm = MockProvider::new(GOOD_ANSWER);

    let err = pipeline_with(graph, llm.clone(), PipelineConfig::default())
        .answer(ibuprofen())
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Safety(SafetyError::GraphUnavailable(_))));
    assert!(err.user_message().contains("Unable to verify medication safety"));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_patient() {
    let llm = MockProvider::new(GOOD_ANSWER);
    let err = pipeline(llm.clone())
        .answer(AnswerRequest::new("patient-x", "Can I take ibuprofen?"))
        .await
        .unwrap_err();

    assert_eq!(err, PipelineError::Safety(SafetyError::NotFound("patient-x".to_string())));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn test_generation_error_with_rules_falls_back() {
    let llm = MockProvider::new(GOOD_ANSWER);
    llm.queue_error();

    let answer = pipeline(llm).answer(ibuprofen()).await.unwrap();
    assert_eq!(answer.outcome, AnswerOutcome::Fallback);
    assert!(answer.verdicts.is_empty());
}

#[tokio::test]
async fn test_generation_error_without_rules_is_an_error() {
    let llm = MockProvider::new("unused");
    llm.queue_error();

    let err = pipeline(llm)
        .answer(AnswerRequest::new("patient-hf", "How do I sleep better?"))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::Generation(_)));
}

#[tokio::test(start_paused = true)]
async fn test_generation_timeout_falls_back() {
    let llm = MockProvider::new(GOOD_ANSWER).with_delay(Duration::from_secs(3600));
    let config = PipelineConfig {
        generation_timeout_secs: 5,
        ..PipelineConfig::default()
    };

    let answer = pipeline_with(Arc::new(graph()), llm, config)
        .answer(ibuprofen())
        .await
        .unwrap();
    assert_eq!(answer.outcome, AnswerOutcome::Fallback);
}

#[tokio::test]
async fn test_check_only() {
    let graph = Arc::new(graph());
    let llm = MockProvider::new(GOOD_ANSWER);
    let pipeline = pipeline_with(graph.clone(), llm.clone(), PipelineConfig::default());

    let check = pipeline.check(&ibuprofen()).await.unwrap();
    assert_eq!(check.matched_rules.len(), 1);
    assert_eq!(llm.call_count(), 0);
    assert_eq!(graph.context_query_count(), 0);
}
