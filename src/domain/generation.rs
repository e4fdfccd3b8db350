//! Answer generation trait

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::retrieval::Passage;
use crate::domain::session::Exchange;
use crate::domain::DomainError;

/// Produces an answer from a question and supporting passages.
///
/// An empty passage slice means the model answers from its own knowledge.
/// `history` holds earlier turns of the conversation, oldest first.
#[async_trait]
pub trait AnswerGenerator: Send + Sync + Debug {
    async fn generate(
        &self,
        question: &str,
        passages: &[Passage],
        history: &[Exchange],
    ) -> Result<String, DomainError>;
}
