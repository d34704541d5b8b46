//! Retrieve, filter, generate, validate, and rewrite until an answer passes
//! both verification gates or the attempt budget runs out.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use crate::domain::generation::{Answer, Generator, QueryRewriter};
use crate::domain::grading::{AnswerGrader, HallucinationGrader, RelevanceGrader};
use crate::domain::index::ScoredPassage;
use crate::domain::rag::{Question, RagConfig, RagEvent, RagOutcome, RagState, RagStatus};
use crate::domain::retrieval::Retriever;
use crate::domain::DomainError;

/// Working data of one run, reset on every new attempt
#[derive(Debug, Default)]
struct Attempt {
    candidates: Vec<ScoredPassage>,
    evidence: Vec<ScoredPassage>,
    answer: Option<Answer>,
}

#[derive(Debug, Clone)]
pub struct RagController {
    retriever: Arc<dyn Retriever>,
    relevance_grader: Arc<dyn RelevanceGrader>,
    hallucination_grader: Arc<dyn HallucinationGrader>,
    answer_grader: Arc<dyn AnswerGrader>,
    generator: Arc<dyn Generator>,
    rewriter: Arc<dyn QueryRewriter>,
    config: RagConfig,
}

impl RagController {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        relevance_grader: Arc<dyn RelevanceGrader>,
        hallucination_grader: Arc<dyn HallucinationGrader>,
        answer_grader: Arc<dyn AnswerGrader>,
        generator: Arc<dyn Generator>,
        rewriter: Arc<dyn QueryRewriter>,
        config: RagConfig,
    ) -> Self {
        Self {
            retriever,
            relevance_grader,
            hallucination_grader,
            answer_grader,
            generator,
            rewriter,
            config,
        }
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Run the loop for one question. Never fails: exhaustion yields the
    /// fallback message.
    #[instrument(skip(self), fields(max_attempts = self.config.effective_max_attempts()))]
    pub async fn answer(&self, question: &str) -> RagOutcome {
        let max_attempts = self.config.effective_max_attempts();
        let mut question = Question::new(question);
        let mut attempt = Attempt::default();
        let mut state = RagState::Retrieve;
        let mut trace = vec![state];

        while !state.is_terminal() {
            let event = match state {
                RagState::Retrieve => self.retrieve(&question, &mut attempt).await,
                RagState::Filter => self.filter(&question, &mut attempt).await,
                RagState::Generate => self.generate(&question, &mut attempt).await,
                RagState::Validate => self.validate(&question, &mut attempt).await,
                RagState::Rewrite => {
                    attempt = Attempt::default();
                    self.rewrite(&mut question, max_attempts).await
                }
                RagState::Done | RagState::Exhausted => break,
            };

            state = match state.next(event) {
                Ok(next) => next,
                Err(e) => {
                    warn!(error = %e, "Recovering from illegal transition");
                    state.next(RagEvent::Fault).unwrap_or(RagState::Exhausted)
                }
            };
            debug!(%state, ?event, attempt = question.attempt(), "Transition");
            trace.push(state);
        }

        let outcome = match (state, attempt.answer) {
            (RagState::Done, Some(answer)) => {
                let answer = answer.mark_validated();
                RagOutcome {
                    text: answer.text.clone(),
                    status: RagStatus::Done,
                    attempts: question.attempt(),
                    answer: Some(answer),
                    evidence: attempt.evidence,
                    trace,
                }
            }
            _ => RagOutcome {
                text: self.config.fallback_message.clone(),
                status: RagStatus::Exhausted,
                attempts: question.attempt(),
                answer: None,
                evidence: Vec::new(),
                trace,
            },
        };

        let status = if outcome.is_done() { "done" } else { "exhausted" };
        metrics::counter!("rag_answers_total", "status" => status).increment(1);
        metrics::histogram!("rag_attempts").record(f64::from(outcome.attempts));
        info!(status, attempts = outcome.attempts, "Question answered");

        outcome
    }

    async fn retrieve(&self, question: &Question, attempt: &mut Attempt) -> RagEvent {
        let retrieval = &self.config.retrieval;
        match self
            .retriever
            .search(question.current(), retrieval.top_k, retrieval.mmr_lambda)
            .await
        {
            Ok(candidates) => {
                debug!(candidates = candidates.len(), "Retrieved passages");
                attempt.candidates = candidates;
                RagEvent::Retrieved
            }
            Err(e) => soft_failure("retrieve", e),
        }
    }

    async fn filter(&self, question: &Question, attempt: &mut Attempt) -> RagEvent {
        let candidates = std::mem::take(&mut attempt.candidates);
        let grades = join_all(
            candidates
                .iter()
                .map(|passage| self.relevance_grader.grade(question.current(), passage)),
        )
        .await;

        attempt.evidence = candidates
            .into_iter()
            .zip(grades)
            .filter_map(|(passage, grade)| grade.is_relevant().then_some(passage))
            .collect();

        debug!(relevant = attempt.evidence.len(), "Filtered passages");

        if attempt.evidence.is_empty() {
            RagEvent::NoneRelevant
        } else {
            RagEvent::RelevantFound
        }
    }

    async fn generate(&self, question: &Question, attempt: &mut Attempt) -> RagEvent {
        match self
            .generator
            .generate(question.current(), &attempt.evidence)
            .await
        {
            Ok(answer) => {
                attempt.answer = Some(answer);
                RagEvent::Generated
            }
            Err(e) => soft_failure("generate", e),
        }
    }

    async fn validate(&self, question: &Question, attempt: &mut Attempt) -> RagEvent {
        let Some(answer) = attempt.answer.as_ref() else {
            return soft_failure(
                "validate",
                DomainError::internal("No answer to validate"),
            );
        };

        let grounding = self
            .hallucination_grader
            .grade(&attempt.evidence, &answer.text)
            .await;
        if !grounding.is_grounded() {
            info!("Answer not supported by evidence");
            return RagEvent::Hallucinated;
        }

        let usefulness = self
            .answer_grader
            .grade(question.current(), &answer.text)
            .await;
        if !usefulness.is_useful() {
            info!("Answer does not resolve the question");
            return RagEvent::NotUseful;
        }

        RagEvent::Accepted
    }

    async fn rewrite(&self, question: &mut Question, max_attempts: u32) -> RagEvent {
        let spent = question.spend_attempt();
        if spent >= max_attempts {
            info!(attempts = spent, "Attempt budget exhausted");
            return RagEvent::AttemptsExhausted;
        }

        match self.rewriter.rewrite(question.current()).await {
            Ok(text) => {
                question.reformulate(text);
                RagEvent::Rewritten
            }
            Err(e) => soft_failure("rewrite", e),
        }
    }
}

fn soft_failure(stage: &'static str, error: DomainError) -> RagEvent {
    warn!(stage, error = %error, "Soft failure, moving on to rewrite");
    metrics::counter!("rag_soft_failures_total", "stage" => stage).increment(1);
    RagEvent::Fault
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generation::{MockGenerator, MockQueryRewriter};
    use crate::domain::grading::{
        GradingPrompts, Grounding, MockAnswerGrader, MockHallucinationGrader,
        MockRelevanceGrader, Relevance, Usefulness,
    };
    use crate::domain::index::Passage;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::retrieval::MockRetriever;
    use crate::infrastructure::grading::LlmRelevanceGrader;

    const QUESTION: &str = "What is the capital of France?";

    fn paris() -> ScoredPassage {
        ScoredPassage::new(
            Passage::new(1, "geo.txt", 0, "Paris is the capital of France. [#1]"),
            0.9,
        )
    }

    struct Fixture {
        retriever: Arc<MockRetriever>,
        relevance: Arc<dyn RelevanceGrader>,
        hallucination: Arc<MockHallucinationGrader>,
        answer: Arc<MockAnswerGrader>,
        generator: Arc<MockGenerator>,
        rewriter: Arc<MockQueryRewriter>,
        config: RagConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                retriever: Arc::new(MockRetriever::new().with_results(vec![paris()])),
                relevance: Arc::new(MockRelevanceGrader::always(Relevance::Relevant)),
                hallucination: Arc::new(MockHallucinationGrader::always(Grounding::Grounded)),
                answer: Arc::new(MockAnswerGrader::always(Usefulness::Useful)),
                generator: Arc::new(MockGenerator::with_text("The capital of France is Paris [#1].")),
                rewriter: Arc::new(MockQueryRewriter::new()),
                config: RagConfig::default(),
            }
        }

        fn controller(&self) -> RagController {
            RagController::new(
                self.retriever.clone(),
                self.relevance.clone(),
                self.hallucination.clone(),
                self.answer.clone(),
                self.generator.clone(),
                self.rewriter.clone(),
                self.config.clone(),
            )
        }
    }

    #[tokio::test]
    async fn test_grounded_answer_on_first_attempt() {
        let fixture = Fixture::new();

        let outcome = fixture.controller().answer(QUESTION).await;

        assert_eq!(outcome.status, RagStatus::Done);
        assert_eq!(outcome.attempts, 0);
        assert!(outcome.text.contains("[#1]"));
        assert_ne!(outcome.text, fixture.config.fallback_message);

        let answer = outcome.answer.unwrap();
        assert!(answer.validated);
        assert!(answer.evidence_ids.contains(&1));
        assert_eq!(outcome.evidence.len(), 1);
        assert_eq!(
            outcome.trace,
            vec![
                RagState::Retrieve,
                RagState::Filter,
                RagState::Generate,
                RagState::Validate,
                RagState::Done,
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_index_exhausts_attempts() {
        let mut fixture = Fixture::new();
        fixture.retriever = Arc::new(MockRetriever::new());

        let outcome = fixture.controller().answer(QUESTION).await;

        assert_eq!(outcome.status, RagStatus::Exhausted);
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.text, fixture.config.fallback_message);
        assert!(outcome.answer.is_none());
        assert_eq!(
            outcome.trace.iter().filter(|s| **s == RagState::Rewrite).count(),
            3
        );
        assert_eq!(outcome.trace.last(), Some(&RagState::Exhausted));

        let queries = fixture.retriever.queries();
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[0], QUESTION);
        assert_eq!(queries[1], format!("{} (rephrased)", QUESTION));
        assert!(fixture.generator.questions().is_empty());
    }

    #[tokio::test]
    async fn test_never_relevant_exhausts_after_max_attempts() {
        let mut fixture = Fixture::new();
        fixture.relevance = Arc::new(MockRelevanceGrader::always(Relevance::NotRelevant));
        fixture.config = RagConfig::default().with_max_attempts(2);

        let outcome = fixture.controller().answer(QUESTION).await;

        assert_eq!(outcome.status, RagStatus::Exhausted);
        assert_eq!(outcome.attempts, 2);
        assert_eq!(fixture.retriever.queries().len(), 2);
        assert!(fixture.generator.questions().is_empty());
    }

    #[tokio::test]
    async fn test_grader_error_counts_as_negative() {
        let mut fixture = Fixture::new();
        let provider = Arc::new(MockLlmProvider::new("mock").with_error("connection refused"));
        fixture.relevance = Arc::new(LlmRelevanceGrader::new(
            provider,
            "m",
            &GradingPrompts::default(),
        ));

        let outcome = fixture.controller().answer(QUESTION).await;

        assert_eq!(outcome.status, RagStatus::Exhausted);
        assert_eq!(outcome.trace[2], RagState::Rewrite);
        assert!(fixture.generator.questions().is_empty());
    }

    #[tokio::test]
    async fn test_hallucination_triggers_rewrite_then_succeeds() {
        let mut fixture = Fixture::new();
        fixture.hallucination = Arc::new(MockHallucinationGrader::sequence(
            vec![Grounding::Hallucinated],
            Grounding::Grounded,
        ));

        let outcome = fixture.controller().answer(QUESTION).await;

        assert_eq!(outcome.status, RagStatus::Done);
        assert_eq!(outcome.attempts, 1);
        assert_eq!(fixture.hallucination.calls(), 2);
        assert_eq!(fixture.answer.calls(), 1);
        assert_eq!(
            fixture.generator.questions()[1],
            format!("{} (rephrased)", QUESTION)
        );
    }

    #[tokio::test]
    async fn test_not_useful_triggers_rewrite() {
        let mut fixture = Fixture::new();
        fixture.answer = Arc::new(MockAnswerGrader::always(Usefulness::NotUseful));

        let outcome = fixture.controller().answer(QUESTION).await;

        assert_eq!(outcome.status, RagStatus::Exhausted);
        assert_eq!(fixture.answer.calls(), 3);
    }

    #[tokio::test]
    async fn test_faults_are_absorbed() {
        let mut fixture = Fixture::new();
        fixture.retriever = Arc::new(MockRetriever::new().with_error("index offline"));
        fixture.rewriter = Arc::new(MockQueryRewriter::new().with_error("llm offline"));

        let outcome = fixture.controller().answer(QUESTION).await;

        assert_eq!(outcome.status, RagStatus::Exhausted);
        assert_eq!(outcome.attempts, 3);
        // A failed rewrite keeps the current question
        assert!(fixture.retriever.queries().iter().all(|q| q == QUESTION));
    }

    #[tokio::test]
    async fn test_generator_fault_moves_to_rewrite() {
        let mut fixture = Fixture::new();
        fixture.generator = Arc::new(MockGenerator::with_error("context too long"));

        let outcome = fixture.controller().answer(QUESTION).await;

        assert_eq!(outcome.status, RagStatus::Exhausted);
        assert_eq!(fixture.generator.questions().len(), 3);
        assert_eq!(fixture.hallucination.calls(), 0);
    }

    #[tokio::test]
    async fn test_zero_max_attempts_is_one() {
        let mut fixture = Fixture::new();
        fixture.retriever = Arc::new(MockRetriever::new());
        fixture.config = RagConfig::default().with_max_attempts(0);

        let outcome = fixture.controller().answer(QUESTION).await;

        assert_eq!(outcome.status, RagStatus::Exhausted);
        assert_eq!(outcome.attempts, 1);
        assert_eq!(fixture.retriever.queries().len(), 1);
    }
}
