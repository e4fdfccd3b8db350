//! LLM provider implementations

pub(crate) mod http_client;
mod openai;

pub use http_client::{HttpClient, HttpClientTrait};
pub use openai::{OpenAiCompatibleProvider, DEFAULT_BASE_URL};
