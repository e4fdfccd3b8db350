//! Chat session storage

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::workflow::RunOutcome;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// One question/answer turn of a chat session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub question: String,
    pub answer: Option<String>,
    pub outcome: RunOutcome,
    pub timestamp: DateTime<Utc>,
}

impl Exchange {
    pub fn new(question: impl Into<String>, answer: Option<String>, outcome: RunOutcome) -> Self {
        Self {
            question: question.into(),
            answer,
            outcome,
            timestamp: Utc::now(),
        }
    }
}

/// Storage for chat sessions.
///
/// A session is created by the first `append` for its id and removed by `end`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Record an exchange, creating the session if needed
    async fn append(&self, session_id: &str, exchange: Exchange) -> Result<(), DomainError>;

    /// Exchanges of a session in insertion order; empty for unknown sessions
    async fn history(&self, session_id: &str) -> Result<Vec<Exchange>, DomainError>;

    /// Drop all exchanges but keep the session
    async fn clear(&self, session_id: &str) -> Result<(), DomainError>;

    /// Remove the session; returns whether it existed
    async fn end(&self, session_id: &str) -> Result<bool, DomainError>;

    /// Ids of all live sessions
    async fn session_ids(&self) -> Result<Vec<String>, DomainError>;
}
