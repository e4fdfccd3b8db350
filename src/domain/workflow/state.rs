//! Mutable context threaded through one run

use serde::{Deserialize, Serialize};

use crate::domain::classification::Route;
use crate::domain::retrieval::Passage;
use crate::domain::session::Exchange;

/// State of a single workflow run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    question: String,
    /// Earlier turns of the conversation, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    history: Vec<Exchange>,
    /// `None` until retrieval or search has run; `Some(vec![])` after
    /// every passage was filtered out.
    pub documents: Option<Vec<Passage>>,
    pub generation: Option<String>,
    pub route: Option<Route>,
    pub generation_attempts: u32,
    pub search_attempts: u32,
    /// Last hallucination grader verdict
    pub grounded: Option<bool>,
    /// Last answer grader verdict
    pub answers_question: Option<bool>,
    pub terminal: bool,
}

impl WorkflowState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            history: Vec::new(),
            documents: None,
            generation: None,
            route: None,
            generation_attempts: 0,
            search_attempts: 0,
            grounded: None,
            answers_question: None,
            terminal: false,
        }
    }

    pub fn with_history(mut self, history: Vec<Exchange>) -> Self {
        self.history = history;
        self
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn history(&self) -> &[Exchange] {
        &self.history
    }

    /// Passages gathered so far, empty when nothing was retrieved yet
    pub fn passages(&self) -> &[Passage] {
        self.documents.as_deref().unwrap_or(&[])
    }

    pub fn has_no_relevant_documents(&self) -> bool {
        matches!(self.documents.as_deref(), Some([]))
    }

    pub fn apply(&mut self, update: StateUpdate) {
        if let Some(documents) = update.documents {
            self.documents = Some(documents);
        }
        if let Some(generation) = update.generation {
            self.generation = Some(generation);
        }
        if let Some(route) = update.route {
            self.route = Some(route);
        }
        if let Some(attempts) = update.generation_attempts {
            self.generation_attempts = attempts;
        }
        if let Some(attempts) = update.search_attempts {
            self.search_attempts = attempts;
        }
        if update.clear_verdicts {
            self.grounded = None;
            self.answers_question = None;
        }
        if let Some(grounded) = update.grounded {
            self.grounded = Some(grounded);
        }
        if let Some(answers) = update.answers_question {
            self.answers_question = Some(answers);
        }
    }
}

/// Partial state produced by a node handler; present fields overwrite
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    pub documents: Option<Vec<Passage>>,
    pub generation: Option<String>,
    pub route: Option<Route>,
    pub generation_attempts: Option<u32>,
    pub search_attempts: Option<u32>,
    pub grounded: Option<bool>,
    pub answers_question: Option<bool>,
    pub clear_verdicts: bool,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(mut self, documents: Vec<Passage>) -> Self {
        self.documents = Some(documents);
        self
    }

    pub fn generation(mut self, generation: impl Into<String>) -> Self {
        self.generation = Some(generation.into());
        self
    }

    pub fn route(mut self, route: Route) -> Self {
        self.route = Some(route);
        self
    }

    pub fn generation_attempts(mut self, attempts: u32) -> Self {
        self.generation_attempts = Some(attempts);
        self
    }

    pub fn search_attempts(mut self, attempts: u32) -> Self {
        self.search_attempts = Some(attempts);
        self
    }

    pub fn grounded(mut self, grounded: bool) -> Self {
        self.grounded = Some(grounded);
        self
    }

    pub fn answers_question(mut self, answers: bool) -> Self {
        self.answers_question = Some(answers);
        self
    }

    /// Forget grader verdicts that belonged to a previous generation
    pub fn clear_verdicts(mut self) -> Self {
        self.clear_verdicts = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = WorkflowState::new("What is SCKS?");

        assert_eq!(state.question(), "What is SCKS?");
        assert!(state.documents.is_none());
        assert!(state.passages().is_empty());
        assert!(!state.has_no_relevant_documents());
        assert!(!state.terminal);
    }

    #[test]
    fn test_empty_documents_differs_from_not_retrieved() {
        let mut state = WorkflowState::new("q");
        state.apply(StateUpdate::new().documents(vec![]));

        assert!(state.has_no_relevant_documents());
        assert_eq!(state.documents, Some(vec![]));
    }

    #[test]
    fn test_apply_overwrites_present_fields_only() {
        let mut state = WorkflowState::new("q");
        state.apply(
            StateUpdate::new()
                .route(Route::Vectorstore)
                .generation("first")
                .generation_attempts(1),
        );
        state.apply(StateUpdate::new().generation("second"));

        assert_eq!(state.route, Some(Route::Vectorstore));
        assert_eq!(state.generation.as_deref(), Some("second"));
        assert_eq!(state.generation_attempts, 1);
    }

    #[test]
    fn test_clear_verdicts_then_set() {
        let mut state = WorkflowState::new("q");
        state.apply(StateUpdate::new().grounded(false).answers_question(true));
        state.apply(StateUpdate::new().clear_verdicts());

        assert_eq!(state.grounded, None);
        assert_eq!(state.answers_question, None);

        state.apply(StateUpdate::new().clear_verdicts().grounded(true));
        assert_eq!(state.grounded, Some(true));
    }
}
