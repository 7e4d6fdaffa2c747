//! Conversation store port
//!
//! Append-only turn log keyed by session id. The orchestrator never writes
//! here itself; the use case persists a turn pair only after the assistant
//! utterance exists.

use async_trait::async_trait;
use interview_domain::{SessionId, Transcript, Turn};
use thiserror::Error;

/// Errors reported by a conversation store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Malformed store data: {0}")]
    Malformed(String),
}

/// Durable turn log
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Append one turn to the end of a session's log
    async fn append_turn(&self, session_id: &SessionId, turn: &Turn) -> Result<(), StoreError>;

    /// Append several turns, in order
    async fn append_turns(&self, session_id: &SessionId, turns: &[Turn]) -> Result<(), StoreError> {
        for turn in turns {
            self.append_turn(session_id, turn).await?;
        }
        Ok(())
    }

    /// Full history in arrival order; empty for an unknown session
    async fn load_history(&self, session_id: &SessionId) -> Result<Transcript, StoreError>;
}
