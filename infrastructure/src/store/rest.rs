//! Conversation store over a hosted PostgREST-style API
//!
//! Each turn is one row in the configured table:
//!
//! ```text
//! id bigserial | session_id text | role text | content text | created_at timestamptz
//! ```
//!
//! Rows are read back ordered by `id`, which the database assigns on insert.

use async_trait::async_trait;
use interview_application::ports::conversation_store::{ConversationStore, StoreError};
use interview_domain::{Role, SessionId, Transcript, Turn};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct NewRow<'a> {
    session_id: &'a str,
    role: Role,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct StoredRow {
    role: Role,
    content: String,
}

pub struct RestConversationStore {
    client: Client,
    base_url: String,
    table: String,
    api_key: String,
}

impl RestConversationStore {
    pub fn new(
        base_url: impl Into<String>,
        table: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            table: table.into(),
            api_key: api_key.into(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.table)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn rows<'a>(session_id: &'a SessionId, turns: &'a [Turn]) -> Vec<NewRow<'a>> {
        turns
            .iter()
            .map(|turn| NewRow {
                session_id: session_id.as_str(),
                role: turn.role,
                content: &turn.content,
            })
            .collect()
    }

    async fn insert(&self, session_id: &SessionId, turns: &[Turn]) -> Result<(), StoreError> {
        if turns.is_empty() {
            return Ok(());
        }
        let response = self
            .authorize(self.client.post(self.table_url()))
            .header("Prefer", "return=minimal")
            .json(&Self::rows(session_id, turns))
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        check(response).await?;
        debug!(session = %session_id, rows = turns.len(), "Stored turns");
        Ok(())
    }
}

async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    if status.is_server_error() {
        return Err(StoreError::Unavailable(format!("{}: {}", status, message)));
    }
    Err(StoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ConversationStore for RestConversationStore {
    async fn append_turn(&self, session_id: &SessionId, turn: &Turn) -> Result<(), StoreError> {
        self.insert(session_id, std::slice::from_ref(turn)).await
    }

    /// One bulk insert, so a user/assistant pair lands together or not at all
    async fn append_turns(&self, session_id: &SessionId, turns: &[Turn]) -> Result<(), StoreError> {
        self.insert(session_id, turns).await
    }

    async fn load_history(&self, session_id: &SessionId) -> Result<Transcript, StoreError> {
        let response = self
            .authorize(self.client.get(self.table_url()))
            .query(&[
                ("session_id", format!("eq.{}", session_id)),
                ("select", "role,content".to_string()),
                ("order", "id.asc".to_string()),
            ])
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let rows: Vec<StoredRow> = check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| Turn {
                role: row.role,
                content: row.content,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url() {
        let store = RestConversationStore::new("https://db.example.com/rest/v1/", "interview_turns", "k");
        assert_eq!(
            store.table_url(),
            "https://db.example.com/rest/v1/interview_turns"
        );
    }

    #[test]
    fn test_rows_serialize_with_lowercase_roles() {
        let id = SessionId::parse("s-9").unwrap();
        let turns = [Turn::user("yes"), Turn::assistant("Great")];
        let json = serde_json::to_value(RestConversationStore::rows(&id, &turns)).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "session_id": "s-9", "role": "user", "content": "yes" },
                { "session_id": "s-9", "role": "assistant", "content": "Great" }
            ])
        );
    }

    #[test]
    fn test_stored_rows_reject_unknown_roles() {
        let ok: Result<Vec<StoredRow>, _> =
            serde_json::from_str(r#"[{"role":"assistant","content":"Hi"}]"#);
        assert!(ok.is_ok());
        let bad: Result<Vec<StoredRow>, _> =
            serde_json::from_str(r#"[{"role":"system","content":"Hi"}]"#);
        assert!(bad.is_err());
    }
}
