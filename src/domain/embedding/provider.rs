//! Query embedding trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for turning a question into a vector for similarity search.
///
/// Only queries are embedded here; documents are indexed by an external
/// ingestion service using the same model.
#[async_trait]
pub trait QueryEmbedder: Send + Sync + Debug {
    /// Embed a single query text
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Get the embedder name
    fn embedder_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;

    #[derive(Debug)]
    pub struct MockQueryEmbedder {
        dimensions: usize,
        error: Option<String>,
    }

    impl MockQueryEmbedder {
        pub fn new(dimensions: usize) -> Self {
            Self {
                dimensions,
                error: None,
            }
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }
    }

    #[async_trait]
    impl QueryEmbedder for MockQueryEmbedder {
        async fn embed_query(&self, text: &str) -> Result<Vec<f32>, DomainError> {
            if let Some(ref error) = self.error {
                return Err(DomainError::provider("mock_embedder", error));
            }

            // Deterministic vector derived from the text bytes
            let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_add(b as u64));
            Ok((0..self.dimensions)
                .map(|i| ((hash.wrapping_add(i as u64) % 1000) as f32 / 1000.0) - 0.5)
                .collect())
        }

        fn embedder_name(&self) -> &'static str {
            "mock"
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_embedder_dimensions() {
            let embedder = MockQueryEmbedder::new(8);

            let vector = embedder.embed_query("SCKS policy").await.unwrap();

            assert_eq!(vector.len(), 8);
        }

        #[tokio::test]
        async fn test_mock_embedder_is_deterministic() {
            let embedder = MockQueryEmbedder::new(16);

            let first = embedder.embed_query("same text").await.unwrap();
            let second = embedder.embed_query("same text").await.unwrap();

            assert_eq!(first, second);
        }

        #[tokio::test]
        async fn test_mock_embedder_error() {
            let embedder = MockQueryEmbedder::new(4).with_error("model not loaded");

            assert!(embedder.embed_query("x").await.is_err());
        }
    }
}
