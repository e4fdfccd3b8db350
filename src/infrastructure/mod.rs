//! Infrastructure layer - External service implementations

pub mod classification;
pub mod embedding;
pub mod factory;
pub mod generation;
pub mod llm;
pub mod logging;
pub mod retrieval;
pub mod retry;
pub mod session;
pub mod web_search;
pub mod workflow;

pub use factory::AdapterFactory;
