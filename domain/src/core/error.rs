//! Domain error types

use crate::interview::stage::Stage;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid history: {0}")]
    InvalidHistory(String),

    #[error("Stage mismatch: transcript is at {expected}, caller supplied {supplied}")]
    StageMismatch { expected: Stage, supplied: Stage },

    #[error("Interview already complete")]
    AlreadyComplete,

    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),

    #[error("Unknown stage: {0}")]
    UnknownStage(String),
}

impl DomainError {
    /// Check if this error means the interview has nothing left to do
    pub fn is_already_complete(&self) -> bool {
        matches!(self, DomainError::AlreadyComplete)
    }
}
