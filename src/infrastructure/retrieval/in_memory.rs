//! In-memory document store for development and testing

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::retrieval::rank_chunks;
use crate::domain::{DocumentStore, DomainError, RetrievedChunk};

/// Scores documents by the share of query terms they contain
#[derive(Debug, Default, Clone)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<Vec<String>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents<I, S>(documents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            documents: Arc::new(RwLock::new(documents.into_iter().map(Into::into).collect())),
        }
    }

    /// Load a text file, one document per blank-line separated paragraph
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::configuration(format!(
                "Failed to read documents from {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self::with_documents(split_paragraphs(&text)))
    }

    pub async fn add_document(&self, content: impl Into<String>) {
        self.documents.write().await.push(content.into());
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

fn split_paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<RetrievedChunk>, DomainError> {
        let query_terms = terms(query);
        if query_terms.is_empty() {
            return Ok(Vec::new());
        }

        let docs = self.documents.read().await;
        let chunks = docs
            .iter()
            .filter_map(|doc| {
                let doc_terms = terms(doc);
                let hits = query_terms.intersection(&doc_terms).count();
                (hits > 0).then(|| {
                    RetrievedChunk::new(doc.clone(), hits as f32 / query_terms.len() as f32)
                })
            })
            .collect();

        Ok(rank_chunks(chunks, k))
    }

    fn store_name(&self) -> &'static str {
        "in_memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryDocumentStore {
        InMemoryDocumentStore::with_documents([
            "SCKS members meet every Tuesday.",
            "The SCKS policy on membership fees was updated in May.",
            "Unrelated text about gardening.",
        ])
    }

    #[tokio::test]
    async fn test_search_ranks_by_overlap() {
        let chunks = store().search("SCKS policy fees", 3).await.unwrap();

        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].content.contains("membership fees"));
        assert!((chunks[0].score - 1.0).abs() < f32::EPSILON);
        assert!(chunks[0].score > chunks[1].score);
    }

    #[tokio::test]
    async fn test_search_respects_k() {
        let chunks = store().search("SCKS", 1).await.unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[tokio::test]
    async fn test_no_match() {
        let chunks = store().search("quantum chromodynamics", 3).await.unwrap();
        assert!(chunks.is_empty());

        let chunks = store().search("  ", 3).await.unwrap();
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn test_add_document() {
        let store = InMemoryDocumentStore::new();
        assert!(store.is_empty().await);

        store.add_document("weather report").await;

        assert_eq!(store.len().await, 1);
        assert_eq!(store.search("weather", 3).await.unwrap().len(), 1);
    }

    #[test]
    fn test_split_paragraphs() {
        let docs = split_paragraphs("first para\nstill first\n\n\n second \n\n");
        assert_eq!(docs, vec!["first para\nstill first", "second"]);
    }

    #[tokio::test]
    async fn test_from_missing_file() {
        let result = InMemoryDocumentStore::from_file("/nonexistent/docs.txt").await;
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }
}
