//! Adaptive RAG
//!
//! Answers questions by routing them through one of three paths:
//! - retrieval from a vector index, with per-passage relevance grading
//! - web search, used directly or as a fallback when no passage is relevant
//! - a direct answer from the model for small talk
//!
//! Generations are checked for grounding and for answering the question, with
//! bounded regeneration and re-search loops.

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use tracing::info;

use infrastructure::workflow::{AdaptiveRagExecutor, WorkflowComponents};
use infrastructure::AdapterFactory;

/// Build the workflow executor and its adapters from configuration
pub async fn build_executor(config: &AppConfig) -> anyhow::Result<AdaptiveRagExecutor> {
    config.validate()?;

    let client = AdapterFactory::http_client(config)?;
    let llm = AdapterFactory::llm_provider(config, client.clone());
    let document_store = AdapterFactory::document_store(config, client.clone()).await?;
    let web_search = AdapterFactory::web_search(config, client)?;

    info!(
        model = %config.llm.model,
        base_url = %config.llm.base_url,
        store = document_store.store_name(),
        search = web_search.provider_name(),
        "Building adaptive RAG workflow"
    );

    let components = WorkflowComponents::from_llm(
        llm,
        &config.llm.model,
        &config.workflow,
        document_store,
        web_search,
    );

    let executor = AdaptiveRagExecutor::new(components, config.workflow.clone())?
        .with_top_k(config.vector_store.top_k)
        .with_max_results(config.web_search.max_results);

    Ok(executor)
}
