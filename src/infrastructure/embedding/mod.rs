//! Query embedder implementations

mod openai;

pub use openai::OpenAiCompatibleEmbedder;

// Re-export HTTP client for use by the embedder
pub use super::llm::{HttpClient, HttpClientTrait};
