//! Adaptive RAG workflow domain
//!
//! The graph is a finite state machine over [`NodeId`]s:
//!
//! ```text
//! route -> retrieve -> grade_documents -> generate
//!       \                             \-> web_search (no relevant passages)
//!        \-> web_search -> generate -> grade_hallucination -> generate (ungrounded)
//!         \-> direct_answer                                \-> grade_answer -> web_search
//!                                                                          \-> end
//! ```
//!
//! Generation and web search are bounded by [`WorkflowConfig`]; hitting a bound
//! ends the run with [`RunOutcome::Exhausted`].

mod config;
mod edges;
mod error;
mod executor;
mod node;
mod state;

pub use config::WorkflowConfig;
pub use edges::{is_accepted, next_transition, would_exceed_bound};
pub use error::WorkflowError;
pub use executor::{RagWorkflow, RunOutcome, RunResult};
pub use node::{NodeId, Transition};
pub use state::{StateUpdate, WorkflowState};

#[cfg(test)]
pub use executor::mock::MockRagWorkflow;
