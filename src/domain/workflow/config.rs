//! Workflow policy configuration

use serde::{Deserialize, Serialize};

use super::WorkflowError;

/// Policy knobs for the adaptive RAG graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Maximum number of generator invocations per run
    #[serde(default = "default_max_generation_retries")]
    pub max_generation_retries: u32,

    /// Maximum number of web searches per run
    #[serde(default = "default_max_search_retries")]
    pub max_search_retries: u32,

    /// Whether the router may answer without any retrieval
    #[serde(default = "default_true")]
    pub allow_direct_answer: bool,

    /// Run the hallucination grader after each generation
    #[serde(default = "default_true")]
    pub check_hallucinations: bool,

    /// Run the answer grader before terminating
    #[serde(default = "default_true")]
    pub check_answers: bool,

    /// Deadline for a whole run in milliseconds
    #[serde(default = "default_run_timeout_ms")]
    pub run_timeout_ms: u64,

    /// What the vector store holds, as told to the router
    #[serde(default = "default_index_topic")]
    pub index_topic: String,

    /// Earlier chat turns given to the generator; 0 disables conversation memory
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,
}

fn default_max_generation_retries() -> u32 {
    3
}

fn default_max_search_retries() -> u32 {
    2
}

fn default_true() -> bool {
    true
}

fn default_run_timeout_ms() -> u64 {
    120_000
}

fn default_index_topic() -> String {
    "SCKS related information".to_string()
}

fn default_max_history_turns() -> usize {
    5
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_generation_retries: default_max_generation_retries(),
            max_search_retries: default_max_search_retries(),
            allow_direct_answer: true,
            check_hallucinations: true,
            check_answers: true,
            run_timeout_ms: default_run_timeout_ms(),
            index_topic: default_index_topic(),
            max_history_turns: default_max_history_turns(),
        }
    }
}

impl WorkflowConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_generation_retries(mut self, max: u32) -> Self {
        self.max_generation_retries = max;
        self
    }

    pub fn with_max_search_retries(mut self, max: u32) -> Self {
        self.max_search_retries = max;
        self
    }

    pub fn with_direct_answer(mut self, allow: bool) -> Self {
        self.allow_direct_answer = allow;
        self
    }

    pub fn with_hallucination_check(mut self, enabled: bool) -> Self {
        self.check_hallucinations = enabled;
        self
    }

    pub fn with_answer_check(mut self, enabled: bool) -> Self {
        self.check_answers = enabled;
        self
    }

    pub fn with_run_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.run_timeout_ms = timeout_ms;
        self
    }

    pub fn with_index_topic(mut self, topic: impl Into<String>) -> Self {
        self.index_topic = topic.into();
        self
    }

    pub fn with_max_history_turns(mut self, turns: usize) -> Self {
        self.max_history_turns = turns;
        self
    }

    pub fn validate(&self) -> Result<(), WorkflowError> {
        if self.max_generation_retries == 0 {
            return Err(WorkflowError::configuration(
                "max_generation_retries must be at least 1",
            ));
        }
        if self.max_search_retries == 0 {
            return Err(WorkflowError::configuration(
                "max_search_retries must be at least 1",
            ));
        }
        if self.run_timeout_ms == 0 {
            return Err(WorkflowError::configuration("run_timeout_ms must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WorkflowConfig::default();
        assert_eq!(config.max_generation_retries, 3);
        assert_eq!(config.max_search_retries, 2);
        assert!(config.allow_direct_answer);
        assert!(config.check_hallucinations);
        assert!(config.check_answers);
        assert_eq!(config.index_topic, "SCKS related information");
        assert_eq!(config.max_history_turns, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = WorkflowConfig::new()
            .with_max_generation_retries(5)
            .with_direct_answer(false)
            .with_answer_check(false);

        assert_eq!(config.max_generation_retries, 5);
        assert!(!config.allow_direct_answer);
        assert!(!config.check_answers);
    }

    #[test]
    fn test_validate_rejects_zero_bounds() {
        assert!(WorkflowConfig::new()
            .with_max_generation_retries(0)
            .validate()
            .is_err());
        assert!(WorkflowConfig::new()
            .with_max_search_retries(0)
            .validate()
            .is_err());
        assert!(WorkflowConfig::new()
            .with_run_timeout_ms(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: WorkflowConfig =
            serde_json::from_str(r#"{"max_search_retries": 4}"#).unwrap();
        assert_eq!(config.max_search_retries, 4);
        assert_eq!(config.max_generation_retries, 3);
    }
}
