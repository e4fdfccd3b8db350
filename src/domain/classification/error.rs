//! Classification error types

use thiserror::Error;

use crate::domain::DomainError;

/// Errors produced by classifier nodes
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClassificationError {
    #[error("Malformed output from {classifier}: {raw:?}")]
    Malformed { classifier: String, raw: String },

    #[error(transparent)]
    Upstream(#[from] DomainError),
}

impl ClassificationError {
    pub fn malformed(classifier: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::Malformed {
            classifier: classifier.into(),
            raw: raw.into(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}
