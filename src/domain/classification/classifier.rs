//! Classifier traits

use async_trait::async_trait;
use std::fmt::Debug;

use super::{BinaryScore, ClassificationError, Route};
use crate::domain::retrieval::Passage;

/// Picks the data source for a question
#[async_trait]
pub trait QuestionRouter: Send + Sync + Debug {
    async fn route(&self, question: &str) -> Result<Route, ClassificationError>;
}

/// Judges whether a single passage is relevant to the question
#[async_trait]
pub trait RelevanceGrader: Send + Sync + Debug {
    async fn grade_relevance(
        &self,
        question: &str,
        passage: &Passage,
    ) -> Result<BinaryScore, ClassificationError>;
}

/// Judges whether a generation is supported by the passages
#[async_trait]
pub trait HallucinationGrader: Send + Sync + Debug {
    async fn grade_grounding(
        &self,
        passages: &[Passage],
        generation: &str,
    ) -> Result<BinaryScore, ClassificationError>;
}

/// Judges whether a generation resolves the question
#[async_trait]
pub trait AnswerGrader: Send + Sync + Debug {
    async fn grade_answer(
        &self,
        question: &str,
        generation: &str,
    ) -> Result<BinaryScore, ClassificationError>;
}
