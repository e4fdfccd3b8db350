//! Bounded exponential backoff for upstream calls

use std::future::Future;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::{
    DocumentStore, DomainError, LlmProvider, LlmRequest, LlmResponse, RetrievedChunk,
    RetryConfig, WebResult, WebSearchProvider,
};

/// Run `call` until it succeeds, fails with a non-retryable error or the
/// retry budget is spent
pub async fn retry_call<T, F, Fut>(
    config: &RetryConfig,
    operation: &str,
    mut call: F,
) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let max_attempts = config.max_retries + 1;
    let mut attempt = 0;

    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt + 1 < max_attempts => {
                let delay = config.delay_for_attempt(attempt);
                warn!(
                    operation,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Upstream call failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Decorator adding retries to an LLM provider, document store or search provider
#[derive(Debug)]
pub struct Retrying<T> {
    inner: T,
    config: RetryConfig,
}

impl<T> Retrying<T> {
    pub fn new(inner: T, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: LlmProvider> LlmProvider for Retrying<T> {
    async fn chat(&self, model: &str, request: LlmRequest) -> Result<LlmResponse, DomainError> {
        retry_call(&self.config, self.inner.provider_name(), || {
            self.inner.chat(model, request.clone())
        })
        .await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}

#[async_trait]
impl<T: DocumentStore> DocumentStore for Retrying<T> {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>, DomainError> {
        retry_call(&self.config, self.inner.store_name(), || {
            self.inner.search(query, k)
        })
        .await
    }

    fn store_name(&self) -> &'static str {
        self.inner.store_name()
    }
}

#[async_trait]
impl<T: WebSearchProvider> WebSearchProvider for Retrying<T> {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<WebResult>, DomainError> {
        retry_call(&self.config, self.inner.provider_name(), || {
            self.inner.search(query, max_results)
        })
        .await
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}
