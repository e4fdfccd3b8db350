//! Builds adapters from application configuration

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::{AppConfig, VectorStoreBackend, WebSearchBackend};
use crate::domain::{DocumentStore, DomainError, LlmProvider, QueryEmbedder, WebSearchProvider};
use crate::infrastructure::embedding::OpenAiCompatibleEmbedder;
use crate::infrastructure::llm::{HttpClient, OpenAiCompatibleProvider};
use crate::infrastructure::retrieval::{InMemoryDocumentStore, QdrantConfig, QdrantDocumentStore};
use crate::infrastructure::retry::Retrying;
use crate::infrastructure::web_search::{DuckDuckGoSearchProvider, TavilySearchProvider};

/// Factory for the upstream adapters used by the workflow.
///
/// Every network-backed adapter is wrapped in [`Retrying`] with the configured backoff.
#[derive(Debug)]
pub struct AdapterFactory;

impl AdapterFactory {
    /// Shared HTTP client with the configured request timeout
    pub fn http_client(config: &AppConfig) -> Result<HttpClient, DomainError> {
        HttpClient::with_timeout(Duration::from_millis(config.llm.timeout_ms))
    }

    pub fn llm_provider(config: &AppConfig, client: HttpClient) -> Arc<dyn LlmProvider> {
        let provider = OpenAiCompatibleProvider::with_base_url(
            client,
            config.llm.api_key.as_str(),
            config.llm.base_url.as_str(),
        );

        Arc::new(Retrying::new(provider, config.retry.clone()))
    }

    pub fn embedder(config: &AppConfig, client: HttpClient) -> Arc<dyn QueryEmbedder> {
        let embedding = &config.embedding;
        let api_key = embedding
            .api_key
            .as_deref()
            .unwrap_or(config.llm.api_key.as_str());

        Arc::new(OpenAiCompatibleEmbedder::new(
            client,
            api_key,
            embedding.resolved_base_url(&config.llm),
            embedding.model.as_str(),
        ))
    }

    pub async fn document_store(
        config: &AppConfig,
        client: HttpClient,
    ) -> Result<Arc<dyn DocumentStore>, DomainError> {
        let store = &config.vector_store;

        match store.backend {
            VectorStoreBackend::Qdrant => {
                let mut qdrant = QdrantConfig::new(store.url.as_str(), store.collection.as_str())
                    .with_content_key(store.content_key.as_str());
                if let Some(ref key) = store.api_key {
                    qdrant = qdrant.with_api_key(key.as_str());
                }
                if let Some(ref name) = store.vector_name {
                    qdrant = qdrant.with_vector_name(name.as_str());
                }

                info!(url = %store.url, collection = %store.collection, "Using Qdrant document store");
                let embedder = Self::embedder(config, client.clone());
                let qdrant = QdrantDocumentStore::new(client, embedder, qdrant);
                Ok(Arc::new(Retrying::new(qdrant, config.retry.clone())))
            }
            VectorStoreBackend::InMemory => {
                let memory = match store.documents_path {
                    Some(ref path) => InMemoryDocumentStore::from_file(path).await?,
                    None => {
                        warn!("In-memory document store has no documents_path, starting empty");
                        InMemoryDocumentStore::new()
                    }
                };

                info!(documents = memory.len().await, "Using in-memory document store");
                Ok(Arc::new(memory))
            }
        }
    }

    pub fn web_search(
        config: &AppConfig,
        client: HttpClient,
    ) -> Result<Arc<dyn WebSearchProvider>, DomainError> {
        let search = &config.web_search;
        let retry = config.retry.clone();

        match search.provider {
            WebSearchBackend::DuckDuckGo => {
                let provider = match search.base_url {
                    Some(ref url) => DuckDuckGoSearchProvider::with_base_url(client, url.as_str()),
                    None => DuckDuckGoSearchProvider::new(client),
                };
                Ok(Arc::new(Retrying::new(provider, retry)))
            }
            WebSearchBackend::Tavily => {
                let api_key = search
                    .api_key
                    .as_deref()
                    .filter(|key| !key.is_empty())
                    .ok_or_else(|| {
                        DomainError::configuration("web_search.api_key is required for tavily")
                    })?;

                let provider = match search.base_url {
                    Some(ref url) => TavilySearchProvider::with_base_url(client, api_key, url.as_str()),
                    None => TavilySearchProvider::new(client, api_key),
                };
                Ok(Arc::new(Retrying::new(provider, retry)))
            }
        }
    }
}
