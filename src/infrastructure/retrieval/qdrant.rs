//! Qdrant document store over the REST API

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::retrieval::rank_chunks;
use crate::domain::{DocumentStore, DomainError, QueryEmbedder, RetrievedChunk};
use crate::infrastructure::llm::HttpClientTrait;

/// Connection settings for a Qdrant collection
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub collection: String,
    pub api_key: Option<String>,
    /// Payload key holding the passage text
    pub content_key: String,
    /// Named vector to search, for collections with several vectors
    pub vector_name: Option<String>,
}

impl QdrantConfig {
    pub fn new(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
            api_key: None,
            content_key: "page_content".to_string(),
            vector_name: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_content_key(mut self, key: impl Into<String>) -> Self {
        self.content_key = key.into();
        self
    }

    pub fn with_vector_name(mut self, name: impl Into<String>) -> Self {
        self.vector_name = Some(name.into());
        self
    }
}

/// Document store that embeds the query and runs a Qdrant similarity search
#[derive(Debug)]
pub struct QdrantDocumentStore<C: HttpClientTrait> {
    client: C,
    embedder: Arc<dyn QueryEmbedder>,
    config: QdrantConfig,
}

impl<C: HttpClientTrait> QdrantDocumentStore<C> {
    pub fn new(client: C, embedder: Arc<dyn QueryEmbedder>, config: QdrantConfig) -> Self {
        Self {
            client,
            embedder,
            config,
        }
    }

    fn search_url(&self) -> String {
        format!(
            "{}/collections/{}/points/search",
            self.config.url, self.config.collection
        )
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = vec![("Content-Type", "application/json")];
        if let Some(ref key) = self.config.api_key {
            headers.push(("api-key", key.as_str()));
        }
        headers
    }

    fn build_request(&self, vector: Vec<f32>, k: usize) -> serde_json::Value {
        let vector = match self.config.vector_name {
            Some(ref name) => serde_json::json!({ "name": name, "vector": vector }),
            None => serde_json::json!(vector),
        };

        serde_json::json!({
            "vector": vector,
            "limit": k,
            "with_payload": true,
        })
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<Vec<RetrievedChunk>, DomainError> {
        let response: SearchResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::invalid_response("qdrant", e.to_string())
        })?;

        let chunks = response
            .result
            .into_iter()
            .filter_map(|point| {
                let content = point
                    .payload
                    .as_ref()
                    .and_then(|p| p.get(&self.config.content_key))
                    .and_then(|v| v.as_str())?
                    .to_string();
                Some(RetrievedChunk::new(content, point.score))
            })
            .collect();

        Ok(chunks)
    }
}

#[async_trait]
impl<C: HttpClientTrait> DocumentStore for QdrantDocumentStore<C> {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>, DomainError> {
        let vector = self.embedder.embed_query(query).await?;
        let body = self.build_request(vector, k);

        debug!(collection = %self.config.collection, k, "Searching Qdrant");

        let response = self
            .client
            .post_json(&self.search_url(), self.headers(), &body)
            .await?;

        Ok(rank_chunks(self.parse_response(response)?, k))
    }

    fn store_name(&self) -> &'static str {
        "qdrant"
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: Vec<ScoredPoint>,
}

#[derive(Debug, Deserialize)]
struct ScoredPoint {
    score: f32,
    payload: Option<serde_json::Map<String, serde_json::Value>>,
}
