//! Workflow runner trait and result types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::WorkflowError;
use super::state::WorkflowState;
use crate::domain::session::Exchange;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// A generation passed every enabled check
    Ok,
    /// A retry bound was hit; the best available generation is returned
    Exhausted,
    /// An upstream dependency failed or the run deadline expired
    UpstreamFailure,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Ok => f.write_str("ok"),
            RunOutcome::Exhausted => f.write_str("exhausted"),
            RunOutcome::UpstreamFailure => f.write_str("upstream_failure"),
        }
    }
}

/// Result of running the graph for one question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub run_id: Uuid,
    pub outcome: RunOutcome,
    /// Final state of the run
    pub state: WorkflowState,
    /// Reason for an upstream failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The failure was the run deadline expiring
    #[serde(default)]
    pub timed_out: bool,
    pub execution_time_ms: u64,
}

impl RunResult {
    pub fn new(run_id: Uuid, outcome: RunOutcome, state: WorkflowState) -> Self {
        Self {
            run_id,
            outcome,
            state,
            error: None,
            timed_out: false,
            execution_time_ms: 0,
        }
    }

    pub fn with_error(mut self, error: &WorkflowError) -> Self {
        self.error = Some(error.to_string());
        self.timed_out = matches!(error, WorkflowError::Timeout { .. });
        self
    }

    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = ms;
        self
    }

    /// The final answer, if any generation was produced
    pub fn answer(&self) -> Option<&str> {
        self.state.generation.as_deref()
    }

    pub fn is_ok(&self) -> bool {
        self.outcome == RunOutcome::Ok
    }
}

/// Runs the adaptive RAG graph
#[async_trait]
pub trait RagWorkflow: Send + Sync + fmt::Debug {
    /// Answer a question. Only invalid input is reported as `Err`; upstream
    /// failures are part of the returned `RunResult`.
    async fn run(&self, question: &str) -> Result<RunResult, WorkflowError> {
        self.run_with_history(question, &[]).await
    }

    /// Answer a follow-up question given earlier turns of the conversation
    async fn run_with_history(
        &self,
        question: &str,
        history: &[Exchange],
    ) -> Result<RunResult, WorkflowError>;
}
