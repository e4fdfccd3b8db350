use serde::{Deserialize, Serialize};

use super::RetrievedChunk;
use crate::domain::web_search::WebResult;

/// Where a passage came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassageSource {
    Index,
    Web,
}

/// A unit of evidence handed to the generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub content: String,
    pub source: PassageSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Passage {
    pub fn from_index(content: impl Into<String>, score: f32) -> Self {
        Self {
            content: content.into(),
            source: PassageSource::Index,
            score: Some(score),
            url: None,
        }
    }

    pub fn from_web(result: &WebResult) -> Self {
        let content = if result.title.is_empty() {
            result.snippet.clone()
        } else if result.snippet.is_empty() {
            result.title.clone()
        } else {
            format!("{}: {}", result.title, result.snippet)
        };

        Self {
            content,
            source: PassageSource::Web,
            score: None,
            url: result.url.clone(),
        }
    }

    pub fn is_web(&self) -> bool {
        self.source == PassageSource::Web
    }
}

impl From<RetrievedChunk> for Passage {
    fn from(chunk: RetrievedChunk) -> Self {
        Self::from_index(chunk.content, chunk.score)
    }
}

/// Join passages into the context block used by prompts
pub fn format_passages(passages: &[Passage]) -> String {
    passages
        .iter()
        .map(|p| p.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
