//! LLM-backed binary graders

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::prompts::{
    render, ANSWER_SYSTEM, ANSWER_USER, HALLUCINATION_SYSTEM, HALLUCINATION_USER,
    RELEVANCE_SYSTEM, RELEVANCE_USER,
};
use crate::domain::classification::parse_binary_score;
use crate::domain::retrieval::format_passages;
use crate::domain::{
    AnswerGrader, BinaryScore, ClassificationError, HallucinationGrader, LlmProvider, LlmRequest,
    Passage, RelevanceGrader,
};

/// One grader implementation serving the relevance, hallucination and answer checks
#[derive(Debug)]
pub struct LlmGrader {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl LlmGrader {
    pub fn new(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    async fn grade(
        &self,
        classifier: &str,
        system: &str,
        user: String,
    ) -> Result<BinaryScore, ClassificationError> {
        let request = LlmRequest::builder()
            .system(system)
            .user(user)
            .temperature(0.0)
            .max_tokens(20)
            .build();

        let response = self.provider.chat(&self.model, request).await?;
        debug!(classifier, raw = response.content(), "Grader replied");

        parse_binary_score(classifier, response.content())
    }
}

#[async_trait]
impl RelevanceGrader for LlmGrader {
    async fn grade_relevance(
        &self,
        question: &str,
        passage: &Passage,
    ) -> Result<BinaryScore, ClassificationError> {
        let user = render(
            RELEVANCE_USER,
            &[("document", passage.content.as_str()), ("question", question)],
        );
        self.grade("relevance_grader", RELEVANCE_SYSTEM, user).await
    }
}

#[async_trait]
impl HallucinationGrader for LlmGrader {
    async fn grade_grounding(
        &self,
        passages: &[Passage],
        generation: &str,
    ) -> Result<BinaryScore, ClassificationError> {
        let documents = format_passages(passages);
        let user = render(
            HALLUCINATION_USER,
            &[("documents", documents.as_str()), ("generation", generation)],
        );
        self.grade("hallucination_grader", HALLUCINATION_SYSTEM, user)
            .await
    }
}

#[async_trait]
impl AnswerGrader for LlmGrader {
    async fn grade_answer(
        &self,
        question: &str,
        generation: &str,
    ) -> Result<BinaryScore, ClassificationError> {
        let user = render(
            ANSWER_USER,
            &[("question", question), ("generation", generation)],
        );
        self.grade("answer_grader", ANSWER_SYSTEM, user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::WebResult;

    fn grader(provider: MockLlmProvider) -> (Arc<MockLlmProvider>, LlmGrader) {
        let provider = Arc::new(provider);
        (provider.clone(), LlmGrader::new(provider, "smollm2"))
    }

    #[tokio::test]
    async fn test_relevance() {
        let (provider, grader) = grader(MockLlmProvider::new("mock").with_response("yes"));
        let passage = Passage::from_index("SCKS meets on Tuesdays", 0.8);

        let score = grader.grade_relevance("When does SCKS meet?", &passage).await.unwrap();

        assert_eq!(score, BinaryScore::Yes);
        let user = provider.requests()[0].messages[1].content_text().to_string();
        assert!(user.contains("SCKS meets on Tuesdays"));
        assert!(user.contains("When does SCKS meet?"));
    }

    #[tokio::test]
    async fn test_hallucination_includes_all_passages() {
        let (provider, grader) = grader(MockLlmProvider::new("mock").with_response("no"));
        let passages = vec![
            Passage::from_index("fact one", 0.9),
            Passage::from_index("fact two", 0.8),
        ];

        let score = grader.grade_grounding(&passages, "made up").await.unwrap();

        assert_eq!(score, BinaryScore::No);
        let request = &provider.requests()[0];
        assert!(request.system_instruction().unwrap().contains("grounded in"));
        assert!(request.messages[1].content_text().contains("fact one\n\nfact two"));
    }

    #[tokio::test]
    async fn test_placeholders_in_passages_stay_literal() {
        let (provider, grader) = grader(MockLlmProvider::new("mock").with_response("no"));
        let passages = vec![Passage::from_web(&WebResult::new("Page", "Claim: ${generation}"))];

        grader
            .grade_grounding(&passages, "The moon is cheese.")
            .await
            .unwrap();

        assert_eq!(
            provider.requests()[0].messages[1].content_text(),
            "Set of facts: \n\n Page: Claim: ${generation} \n\n LLM generation: The moon is cheese."
        );
    }

    #[tokio::test]
    async fn test_answer_json_output() {
        let (_, grader) =
            grader(MockLlmProvider::new("mock").with_response(r#"{"binary_score": "yes"}"#));

        let score = grader.grade_answer("q", "a").await.unwrap();

        assert!(score.is_yes());
    }

    #[tokio::test]
    async fn test_malformed_output() {
        let (_, grader) = grader(MockLlmProvider::new("mock").with_response("It depends."));

        let err = grader.grade_answer("q", "a").await.unwrap_err();

        assert_eq!(err, ClassificationError::malformed("answer_grader", "It depends."));
    }

    #[tokio::test]
    async fn test_upstream_failure() {
        let (_, grader) = grader(MockLlmProvider::new("mock").with_error("timeout"));

        let err = grader
            .grade_relevance("q", &Passage::from_index("d", 0.1))
            .await
            .unwrap_err();

        assert!(!err.is_malformed());
    }
}
