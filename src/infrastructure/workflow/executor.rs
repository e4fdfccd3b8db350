//! Adaptive RAG graph executor

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::workflow::{is_accepted, next_transition, would_exceed_bound};
use crate::domain::{
    AnswerGenerator, AnswerGrader, BinaryScore, ClassificationError, DocumentStore, Exchange,
    HallucinationGrader, LlmProvider, NodeId, Passage, QuestionRouter, RagWorkflow,
    RelevanceGrader, Route, RunOutcome, RunResult, StateUpdate, Transition, WebSearchProvider,
    WorkflowConfig, WorkflowError, WorkflowState,
};
use crate::infrastructure::classification::{LlmGrader, LlmRouter};
use crate::infrastructure::generation::LlmGenerator;

/// Default number of passages fetched from the document store
pub const DEFAULT_TOP_K: usize = 3;

/// Default number of web results per search
pub const DEFAULT_MAX_RESULTS: usize = 1;

/// Collaborators invoked by the graph nodes
#[derive(Clone)]
pub struct WorkflowComponents {
    pub router: Arc<dyn QuestionRouter>,
    pub document_store: Arc<dyn DocumentStore>,
    pub web_search: Arc<dyn WebSearchProvider>,
    pub relevance_grader: Arc<dyn RelevanceGrader>,
    pub hallucination_grader: Arc<dyn HallucinationGrader>,
    pub answer_grader: Arc<dyn AnswerGrader>,
    pub generator: Arc<dyn AnswerGenerator>,
}

impl WorkflowComponents {
    /// Wire every classifier and the generator to one chat model
    pub fn from_llm(
        provider: Arc<dyn LlmProvider>,
        model: &str,
        config: &WorkflowConfig,
        document_store: Arc<dyn DocumentStore>,
        web_search: Arc<dyn WebSearchProvider>,
    ) -> Self {
        let grader = Arc::new(LlmGrader::new(provider.clone(), model));

        Self {
            router: Arc::new(LlmRouter::new(
                provider.clone(),
                model,
                &config.index_topic,
                config.allow_direct_answer,
            )),
            document_store,
            web_search,
            relevance_grader: grader.clone(),
            hallucination_grader: grader.clone(),
            answer_grader: grader,
            generator: Arc::new(LlmGenerator::new(provider, model)),
        }
    }
}

impl fmt::Debug for WorkflowComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowComponents")
            .field("router", &self.router)
            .field("document_store", &self.document_store.store_name())
            .field("web_search", &self.web_search.provider_name())
            .field("generator", &self.generator)
            .finish_non_exhaustive()
    }
}

/// Runs the adaptive RAG state machine.
///
/// Holds only shared handles; per-run state lives in [`WorkflowState`].
#[derive(Debug)]
pub struct AdaptiveRagExecutor {
    components: WorkflowComponents,
    config: WorkflowConfig,
    top_k: usize,
    max_results: usize,
}

impl AdaptiveRagExecutor {
    pub fn new(components: WorkflowComponents, config: WorkflowConfig) -> Result<Self, WorkflowError> {
        config.validate()?;

        Ok(Self {
            components,
            config,
            top_k: DEFAULT_TOP_K,
            max_results: DEFAULT_MAX_RESULTS,
        })
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Walk the graph until it ends, hits a bound or fails
    async fn drive(
        &self,
        state: &mut WorkflowState,
        deadline: Instant,
    ) -> Result<RunOutcome, WorkflowError> {
        let mut node = NodeId::START;

        loop {
            if would_exceed_bound(node, state, &self.config) {
                info!(
                    node = %node,
                    generation_attempts = state.generation_attempts,
                    search_attempts = state.search_attempts,
                    "Retry bound reached"
                );
                state.terminal = true;
                return Ok(RunOutcome::Exhausted);
            }

            debug!(node = %node, "Entering node");
            let update = tokio::time::timeout_at(deadline, self.execute_node(node, state))
                .await
                .map_err(|_| WorkflowError::timeout(node.as_str(), self.config.run_timeout_ms))??;
            state.apply(update);

            let transition = next_transition(node, state, &self.config);
            debug!(node = %node, ?transition, "Node finished");

            match transition {
                Transition::Goto(next) => node = next,
                Transition::End => {
                    state.terminal = true;
                    return Ok(if is_accepted(state) {
                        RunOutcome::Ok
                    } else {
                        RunOutcome::Exhausted
                    });
                }
            }
        }
    }

    async fn execute_node(
        &self,
        node: NodeId,
        state: &WorkflowState,
    ) -> Result<StateUpdate, WorkflowError> {
        match node {
            NodeId::Route => self.route(state).await,
            NodeId::Retrieve => self.retrieve(state).await,
            NodeId::GradeDocuments => self.grade_documents(state).await,
            NodeId::WebSearch => self.web_search(state).await,
            NodeId::Generate => self.generate(state, false).await,
            NodeId::DirectAnswer => self.generate(state, true).await,
            NodeId::GradeHallucination => self.grade_hallucination(state).await,
            NodeId::GradeAnswer => self.grade_answer(state).await,
        }
    }

    async fn route(&self, state: &WorkflowState) -> Result<StateUpdate, WorkflowError> {
        let route = match self.components.router.route(state.question()).await {
            Ok(Route::DirectAnswer) if !self.config.allow_direct_answer => {
                info!("Direct answers are disabled, routing to web search");
                Route::Websearch
            }
            Ok(route) => route,
            Err(ClassificationError::Malformed { raw, .. }) => {
                warn!(raw = %raw, "Unrecognized route label, falling back to web search");
                Route::Websearch
            }
            Err(ClassificationError::Upstream(e)) => {
                return Err(WorkflowError::node_execution(NodeId::Route.as_str(), e.to_string()));
            }
        };

        info!(route = %route, "Question routed");
        Ok(StateUpdate::new().route(route))
    }

    async fn retrieve(&self, state: &WorkflowState) -> Result<StateUpdate, WorkflowError> {
        let store = &self.components.document_store;
        let mut documents = state.passages().to_vec();

        match store.search(state.question(), self.top_k).await {
            Ok(chunks) => {
                debug!(store = store.store_name(), count = chunks.len(), "Retrieved passages");
                documents.extend(chunks.into_iter().map(Passage::from));
            }
            Err(e) => {
                warn!(
                    store = store.store_name(),
                    error = %e,
                    "Document store unavailable, continuing with no passages"
                );
            }
        }

        Ok(StateUpdate::new().documents(documents))
    }

    async fn grade_documents(&self, state: &WorkflowState) -> Result<StateUpdate, WorkflowError> {
        let mut relevant = Vec::with_capacity(state.passages().len());

        for passage in state.passages() {
            let verdict = self
                .components
                .relevance_grader
                .grade_relevance(state.question(), passage)
                .await;

            if self.verdict(NodeId::GradeDocuments, verdict)? {
                relevant.push(passage.clone());
            }
        }

        let dropped = state.passages().len() - relevant.len();
        if relevant.is_empty() {
            info!(dropped, "No relevant passages, falling back to web search");
        } else {
            debug!(kept = relevant.len(), dropped, "Graded passages");
        }

        Ok(StateUpdate::new().documents(relevant))
    }

    async fn web_search(&self, state: &WorkflowState) -> Result<StateUpdate, WorkflowError> {
        let provider = &self.components.web_search;
        let results = provider
            .search(state.question(), self.max_results)
            .await
            .map_err(|e| WorkflowError::node_execution(NodeId::WebSearch.as_str(), e.to_string()))?;

        if results.is_empty() {
            info!(provider = provider.provider_name(), "Web search returned no results");
        }

        let mut documents = state.passages().to_vec();
        documents.extend(results.iter().map(Passage::from_web));

        Ok(StateUpdate::new()
            .documents(documents)
            .search_attempts(state.search_attempts + 1))
    }

    async fn generate(
        &self,
        state: &WorkflowState,
        direct: bool,
    ) -> Result<StateUpdate, WorkflowError> {
        let (node, passages) = if direct {
            (NodeId::DirectAnswer, &[][..])
        } else {
            (NodeId::Generate, state.passages())
        };

        let generation = self
            .components
            .generator
            .generate(state.question(), passages, state.history())
            .await
            .map_err(|e| WorkflowError::node_execution(node.as_str(), e.to_string()))?;

        let attempts = state.generation_attempts + 1;
        debug!(attempt = attempts, passages = passages.len(), "Generated answer");

        Ok(StateUpdate::new()
            .generation(generation)
            .generation_attempts(attempts)
            .clear_verdicts())
    }

    async fn grade_hallucination(&self, state: &WorkflowState) -> Result<StateUpdate, WorkflowError> {
        let generation = state.generation.as_deref().unwrap_or_default();
        let verdict = self
            .components
            .hallucination_grader
            .grade_grounding(state.passages(), generation)
            .await;

        let grounded = self.verdict(NodeId::GradeHallucination, verdict)?;
        if !grounded {
            info!(attempt = state.generation_attempts, "Generation is not grounded in the passages");
        }

        Ok(StateUpdate::new().grounded(grounded))
    }

    async fn grade_answer(&self, state: &WorkflowState) -> Result<StateUpdate, WorkflowError> {
        let generation = state.generation.as_deref().unwrap_or_default();
        let verdict = self
            .components
            .answer_grader
            .grade_answer(state.question(), generation)
            .await;

        let answers = self.verdict(NodeId::GradeAnswer, verdict)?;
        if !answers {
            info!(searches = state.search_attempts, "Generation does not answer the question");
        }

        Ok(StateUpdate::new().answers_question(answers))
    }

    /// Malformed grader output counts as `no`
    fn verdict(
        &self,
        node: NodeId,
        verdict: Result<BinaryScore, ClassificationError>,
    ) -> Result<bool, WorkflowError> {
        match verdict {
            Ok(score) => Ok(score.is_yes()),
            Err(ClassificationError::Malformed { classifier, raw }) => {
                warn!(classifier = %classifier, raw = %raw, "Malformed grader output, treating as 'no'");
                Ok(false)
            }
            Err(ClassificationError::Upstream(e)) => {
                Err(WorkflowError::node_execution(node.as_str(), e.to_string()))
            }
        }
    }
}

/// The last `limit` answered turns, oldest first
fn recent_turns(history: &[Exchange], limit: usize) -> Vec<Exchange> {
    let answered: Vec<&Exchange> = history.iter().filter(|e| e.answer.is_some()).collect();
    let start = answered.len().saturating_sub(limit);
    answered[start..].iter().map(|e| (*e).clone()).collect()
}

#[async_trait]
impl RagWorkflow for AdaptiveRagExecutor {
    async fn run_with_history(
        &self,
        question: &str,
        history: &[Exchange],
    ) -> Result<RunResult, WorkflowError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(WorkflowError::invalid_input("question is empty"));
        }

        let run_id = Uuid::new_v4();
        let span = info_span!("rag_run", run_id = %run_id);
        let start = Instant::now();
        let deadline = start + Duration::from_millis(self.config.run_timeout_ms);
        let mut state = WorkflowState::new(question)
            .with_history(recent_turns(history, self.config.max_history_turns));

        let result = self.drive(&mut state, deadline).instrument(span.clone()).await;
        let elapsed = start.elapsed().as_millis() as u64;

        let _guard = span.enter();
        match result {
            Ok(outcome) => {
                info!(
                    outcome = %outcome,
                    generation_attempts = state.generation_attempts,
                    search_attempts = state.search_attempts,
                    elapsed_ms = elapsed,
                    "Run finished"
                );
                Ok(RunResult::new(run_id, outcome, state).with_execution_time(elapsed))
            }
            Err(e) => {
                warn!(error = %e, elapsed_ms = elapsed, "Run failed");
                state.terminal = true;
                Ok(RunResult::new(run_id, RunOutcome::UpstreamFailure, state)
                    .with_error(&e)
                    .with_execution_time(elapsed))
            }
        }
    }
}
