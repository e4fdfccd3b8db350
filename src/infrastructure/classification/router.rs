//! LLM-backed question router

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::prompts::{render, ROUTER_DIRECT_ANSWER, ROUTER_SYSTEM};
use crate::domain::classification::parse_route;
use crate::domain::{ClassificationError, LlmProvider, LlmRequest, QuestionRouter, Route};

#[derive(Debug)]
pub struct LlmRouter {
    provider: Arc<dyn LlmProvider>,
    model: String,
    system_prompt: String,
}

impl LlmRouter {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        index_topic: &str,
        allow_direct_answer: bool,
    ) -> Self {
        let direct_answer = if allow_direct_answer {
            ROUTER_DIRECT_ANSWER
        } else {
            ""
        };
        let system_prompt = render(
            ROUTER_SYSTEM,
            &[("index_topic", index_topic), ("direct_answer", direct_answer)],
        );

        Self {
            provider,
            model: model.into(),
            system_prompt,
        }
    }
}

#[async_trait]
impl QuestionRouter for LlmRouter {
    async fn route(&self, question: &str) -> Result<Route, ClassificationError> {
        let request = LlmRequest::builder()
            .system(self.system_prompt.as_str())
            .user(question)
            .temperature(0.0)
            .max_tokens(20)
            .build();

        let response = self.provider.chat(&self.model, request).await?;
        debug!(raw = response.content(), "Router replied");

        parse_route(response.content())
    }
}
