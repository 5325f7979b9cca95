//! Safety-gated question answering

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::prompt::{base_context, stricter_instructions, system_instructions};
use crate::types::{Answer, AnswerOutcome, AnswerRequest};
use medrag_domain::traits::{GraphStore, TextGenerator};
use medrag_domain::{AliasDictionary, ContextTriple, GateVerdict, Prompt, QuestionId, SafetyCheckResult};
use medrag_safety::{
    build_injected_context, fallback_answer, ContraindicationChecker, SafetyConfig, SafetyError,
    SafetyGate,
};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, info_span, warn, Instrument};

/// Answers patient questions with the contraindication check around generation
///
/// Per question: safety check, base context, directive injection,
/// generation, gate. A rejected answer is regenerated under stricter
/// instructions up to `max_regenerations` times, then replaced by the
/// rule-citing fallback. Safety check failures abort before generation.
pub struct AnswerPipeline<G, L>
where
    G: GraphStore,
    L: TextGenerator,
{
    checker: ContraindicationChecker<G>,
    graph: Arc<G>,
    generator: Arc<L>,
    gate: SafetyGate,
    config: PipelineConfig,
}

impl<G, L> AnswerPipeline<G, L>
where
    G: GraphStore + Send + Sync,
    L: TextGenerator + Send + Sync,
{
    /// Create a new pipeline
    pub fn new(
        graph: Arc<G>,
        generator: Arc<L>,
        aliases: Arc<AliasDictionary>,
        safety: SafetyConfig,
        config: PipelineConfig,
    ) -> Self {
        let gate = SafetyGate::new(safety.gate.clone(), aliases.clone());
        Self {
            checker: ContraindicationChecker::new(graph.clone(), aliases, safety),
            graph,
            generator,
            gate,
            config,
        }
    }

    /// Pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Safety check only, without generation
    pub async fn check(&self, request: &AnswerRequest) -> Result<SafetyCheckResult, PipelineError> {
        Ok(self.checker.check(&request.patient_id, &request.question).await?)
    }

    /// Answer a question
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Safety`] when the check or context retrieval fails;
    ///   nothing is generated
    /// - [`PipelineError::Generation`] when generation fails and no rule applies
    pub async fn answer(&self, request: AnswerRequest) -> Result<Answer, PipelineError> {
        let question_id = QuestionId::new();
        let span = info_span!("answer", question_id = %question_id, patient = %request.patient_id);
        self.answer_inner(question_id, request).instrument(span).await
    }

    async fn answer_inner(
        &self,
        question_id: QuestionId,
        request: AnswerRequest,
    ) -> Result<Answer, PipelineError> {
        let check = self.checker.check(&request.patient_id, &request.question).await?;

        let triples = self.subgraph(&request.patient_id).await?;
        let context = build_injected_context(&check.matched_rules, &base_context(&check, &triples));
        debug!("Context has {} lines", context.len());

        let mut verdicts: Vec<GateVerdict> = Vec::new();
        let mut system = system_instructions(&check);

        for attempt in 0..=self.config.max_regenerations {
            let prompt = Prompt::new(system.clone(), context.clone(), request.question.clone());
            let text = match self.generate(&prompt).await {
                Ok(text) => text,
                Err(e) if check.has_warnings() => {
                    warn!("Generation failed with rules present, using fallback: {}", e);
                    return Ok(self.fallback(question_id, check, verdicts));
                }
                Err(e) => return Err(e),
            };

            let verdict = self.gate.validate(&text, &check);
            if verdict.passed {
                let outcome = if attempt == 0 {
                    AnswerOutcome::Accepted
                } else {
                    AnswerOutcome::Regenerated
                };
                info!("Answer {} after {} generation(s)", outcome, attempt + 1);
                verdicts.push(verdict);
                return Ok(Answer {
                    question_id,
                    text,
                    outcome,
                    check,
                    verdicts,
                    model: self.generator.model_name().to_string(),
                });
            }

            warn!("Gate rejected attempt {}: {}", attempt + 1, verdict.detail);
            system = stricter_instructions(&check, &verdict);
            verdicts.push(verdict);
        }

        Ok(self.fallback(question_id, check, verdicts))
    }

    async fn subgraph(&self, patient_id: &str) -> Result<Vec<ContextTriple>, PipelineError> {
        let limit = self.checker.config().graph_timeout();
        let rows = timeout(limit, self.graph.subgraph_context(patient_id, self.config.context_limit))
            .await
            .map_err(|_| {
                SafetyError::GraphUnavailable(format!("context lookup timed out after {:?}", limit))
            })?
            .map_err(|e| SafetyError::GraphUnavailable(e.to_string()))?;
        Ok(rows)
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String, PipelineError> {
        let limit = self.config.generation_timeout();
        timeout(limit, self.generator.generate(prompt))
            .await
            .map_err(|_| PipelineError::Generation(format!("timed out after {:?}", limit)))?
            .map_err(|e| PipelineError::Generation(e.to_string()))
    }

    fn fallback(
        &self,
        question_id: QuestionId,
        check: SafetyCheckResult,
        verdicts: Vec<GateVerdict>,
    ) -> Answer {
        info!("Answer fallback with {} rule(s)", check.matched_rules.len());
        Answer {
            question_id,
            text: fallback_answer(&check),
            outcome: AnswerOutcome::Fallback,
            check,
            verdicts,
            model: self.generator.model_name().to_string(),
        }
    }
}
