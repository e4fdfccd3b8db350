//! Workflow error types

use thiserror::Error;

/// Errors that can occur while running the workflow graph
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Node '{node}' failed: {message}")]
    NodeExecution { node: String, message: String },

    #[error("Timeout in node '{node}' after {timeout_ms}ms")]
    Timeout { node: String, timeout_ms: u64 },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl WorkflowError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn node_execution(node: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NodeExecution {
            node: node.into(),
            message: message.into(),
        }
    }

    pub fn timeout(node: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            node: node.into(),
            timeout_ms,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
