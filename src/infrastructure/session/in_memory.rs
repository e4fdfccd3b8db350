//! In-memory session store implementation

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::error::DomainError;
use crate::domain::session::{Exchange, SessionStore};

/// In-memory implementation of SessionStore
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, Vec<Exchange>>>>,
}

impl InMemorySessionStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn append(&self, session_id: &str, exchange: Exchange) -> Result<(), DomainError> {
        if session_id.trim().is_empty() {
            return Err(DomainError::validation("session id must not be empty"));
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_default()
            .push(exchange);
        Ok(())
    }

    async fn history(&self, session_id: &str) -> Result<Vec<Exchange>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).cloned().unwrap_or_default())
    }

    async fn clear(&self, session_id: &str) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        if let Some(exchanges) = sessions.get_mut(session_id) {
            exchanges.clear();
        }
        Ok(())
    }

    async fn end(&self, session_id: &str) -> Result<bool, DomainError> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.remove(session_id).is_some())
    }

    async fn session_ids(&self) -> Result<Vec<String>, DomainError> {
        let sessions = self.sessions.read().await;
        let mut ids: Vec<String> = sessions.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
