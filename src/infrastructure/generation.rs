//! LLM-backed answer generator

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::retrieval::format_passages;
use crate::domain::{AnswerGenerator, DomainError, Exchange, LlmProvider, LlmRequest, Passage};
use crate::infrastructure::classification::prompts::{
    render, DIRECT_SYSTEM, GENERATOR_SYSTEM, GENERATOR_USER,
};

/// Generates answers at zero temperature so identical inputs give identical output
#[derive(Debug)]
pub struct LlmGenerator {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl LlmGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// System prompt, then each answered earlier turn as a user/assistant
    /// pair, then the current question
    fn build_request(&self, question: &str, passages: &[Passage], history: &[Exchange]) -> LlmRequest {
        let system = if passages.is_empty() {
            DIRECT_SYSTEM
        } else {
            GENERATOR_SYSTEM
        };

        let mut builder = LlmRequest::builder().system(system);
        for exchange in history {
            if let Some(answer) = exchange.answer.as_deref() {
                builder = builder.user(exchange.question.as_str()).assistant(answer);
            }
        }

        let user = if passages.is_empty() {
            question.to_string()
        } else {
            let context = format_passages(passages);
            render(
                GENERATOR_USER,
                &[("question", question), ("context", context.as_str())],
            )
        };

        builder.user(user).temperature(0.0).build()
    }
}

#[async_trait]
impl AnswerGenerator for LlmGenerator {
    async fn generate(
        &self,
        question: &str,
        passages: &[Passage],
        history: &[Exchange],
    ) -> Result<String, DomainError> {
        let request = self.build_request(question, passages, history);
        let response = self.provider.chat(&self.model, request).await?;

        Ok(response.content().trim().to_string())
    }
}
