//! LLM-backed router and graders

mod grader;
pub(crate) mod prompts;
mod router;

pub use grader::LlmGrader;
pub use router::LlmRouter;
