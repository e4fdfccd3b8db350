//! Document store trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// A raw hit returned by a document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub content: String,
    pub score: f32,
}

impl RetrievedChunk {
    pub fn new(content: impl Into<String>, score: f32) -> Self {
        Self {
            content: content.into(),
            score,
        }
    }
}

/// Similarity search over an indexed collection
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Return up to `k` chunks ordered by descending score
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>, DomainError>;

    /// Get the store name
    fn store_name(&self) -> &'static str;
}

/// Sort chunks by descending score and keep the best `k`
pub fn rank_chunks(mut chunks: Vec<RetrievedChunk>, k: usize) -> Vec<RetrievedChunk> {
    chunks.sort_by(|a, b| b.score.total_cmp(&a.score));
    chunks.truncate(k);
    chunks
}
