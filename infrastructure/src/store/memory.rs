//! In-process conversation store

use async_trait::async_trait;
use interview_application::ports::conversation_store::{ConversationStore, StoreError};
use interview_domain::{SessionId, Transcript, Turn};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Keeps every session in memory; lost on restart
#[derive(Default)]
pub struct InMemoryConversationStore {
    sessions: RwLock<HashMap<SessionId, Vec<Turn>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn append_turn(&self, session_id: &SessionId, turn: &Turn) -> Result<(), StoreError> {
        self.sessions
            .write()
            .await
            .entry(session_id.clone())
            .or_default()
            .push(turn.clone());
        Ok(())
    }

    async fn append_turns(&self, session_id: &SessionId, turns: &[Turn]) -> Result<(), StoreError> {
        // single lock so concurrent readers never see half a pair
        self.sessions
            .write()
            .await
            .entry(session_id.clone())
            .or_default()
            .extend_from_slice(turns);
        Ok(())
    }

    async fn load_history(&self, session_id: &SessionId) -> Result<Transcript, StoreError> {
        Ok(self
            .sessions
            .read()
            .await
            .get(session_id)
            .map(|turns| Transcript::from_turns(turns.clone()))
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_session_is_empty() {
        let store = InMemoryConversationStore::new();
        let history = store
            .load_history(&SessionId::parse("nobody").unwrap())
            .await
            .unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated_and_ordered() {
        let store = InMemoryConversationStore::new();
        let a = SessionId::parse("a").unwrap();
        let b = SessionId::parse("b").unwrap();

        store.append_turn(&a, &Turn::assistant("Hi")).await.unwrap();
        store
            .append_turns(&a, &[Turn::user("yes"), Turn::assistant("Great")])
            .await
            .unwrap();
        store.append_turn(&b, &Turn::assistant("Hello")).await.unwrap();

        let history = store.load_history(&a).await.unwrap();
        let contents: Vec<&str> = history.turns().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["Hi", "yes", "Great"]);
        assert_eq!(store.load_history(&b).await.unwrap().turn_count(), 1);
        assert_eq!(store.session_count().await, 2);
    }
}
