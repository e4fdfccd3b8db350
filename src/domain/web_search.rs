//! Web search provider trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// A single search engine hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebResult {
    pub title: String,
    pub snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl WebResult {
    pub fn new(title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Queries an external search engine
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WebSearchProvider: Send + Sync {
    /// Return at most `max_results` hits for the query
    async fn search(&self, query: &str, max_results: usize)
        -> Result<Vec<WebResult>, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
