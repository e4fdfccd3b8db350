//! Domain layer - workflow state, labels and the traits adapters implement

pub mod classification;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod llm;
pub mod retrieval;
pub mod retry;
pub mod session;
pub mod web_search;
pub mod workflow;

pub use classification::{
    AnswerGrader, BinaryScore, ClassificationError, HallucinationGrader, QuestionRouter,
    RelevanceGrader, Route,
};
pub use embedding::QueryEmbedder;
pub use error::DomainError;
pub use generation::AnswerGenerator;
pub use llm::{
    FinishReason, LlmProvider, LlmRequest, LlmRequestBuilder, LlmResponse, Message, MessageRole,
    Usage,
};
pub use retrieval::{DocumentStore, Passage, PassageSource, RetrievedChunk};
pub use retry::RetryConfig;
pub use session::{Exchange, SessionStore};
pub use web_search::{WebResult, WebSearchProvider};
pub use workflow::{
    NodeId, RagWorkflow, RunOutcome, RunResult, StateUpdate, Transition, WorkflowConfig,
    WorkflowError, WorkflowState,
};
