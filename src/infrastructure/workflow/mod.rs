//! Workflow infrastructure implementations

mod executor;

pub use executor::{AdaptiveRagExecutor, WorkflowComponents, DEFAULT_MAX_RESULTS, DEFAULT_TOP_K};
