//! Request and response bodies

use super::error::{ApiError, ApiResult};
use interview_application::{NextTurnOutput, SessionStatus};
use interview_domain::{CompletionSignal, LeadProfile, SessionId, Stage, Transcript, Turn};
use serde::{Deserialize, Serialize};

/// Size limits applied at the boundary
#[derive(Debug, Clone, Copy)]
pub struct RequestLimits {
    pub max_content_chars: usize,
    pub max_history_turns: usize,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            max_content_chars: 4000,
            max_history_turns: 200,
        }
    }
}

/// `POST /v1/sessions/{id}/turns`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplyRequest {
    pub content: String,
}

impl ReplyRequest {
    pub fn validate(&self, limits: &RequestLimits) -> ApiResult<()> {
        validate_content(&self.content, limits, "content")
    }
}

/// `POST /v1/interview/next-turn`
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NextTurnRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub history: Vec<Turn>,
    pub stage: String,
}

impl NextTurnRequest {
    /// Check limits and convert into typed values
    pub fn into_parts(self, limits: &RequestLimits) -> ApiResult<(SessionId, Transcript, Stage)> {
        if self.history.len() > limits.max_history_turns {
            return Err(ApiError::unprocessable(
                "history_too_long",
                format!(
                    "history has {} turns, at most {} are accepted",
                    self.history.len(),
                    limits.max_history_turns
                ),
            ));
        }
        if let Some(reply) = self.history.last().filter(|turn| turn.is_user()) {
            validate_content(&reply.content, limits, "history[-1].content")?;
        }

        let stage: Stage = self.stage.parse()?;
        let session_id = match self.session_id {
            Some(raw) => SessionId::parse(raw)?,
            None => SessionId::generate(),
        };
        Ok((session_id, Transcript::from_turns(self.history), stage))
    }
}

fn validate_content(content: &str, limits: &RequestLimits, field: &str) -> ApiResult<()> {
    if content.trim().is_empty() {
        return Err(ApiError::unprocessable(
            "empty_content",
            format!("{} cannot be empty", field),
        ));
    }
    let chars = content.chars().count();
    if chars > limits.max_content_chars {
        return Err(ApiError::unprocessable(
            "content_too_long",
            format!(
                "{} has {} characters, at most {} are accepted",
                field, chars, limits.max_content_chars
            ),
        ));
    }
    Ok(())
}

/// Result of one turn
#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub session_id: SessionId,
    pub utterance: String,
    pub stage: Stage,
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<CompletionSignal>,
}

impl From<NextTurnOutput> for TurnResponse {
    fn from(output: NextTurnOutput) -> Self {
        Self {
            session_id: output.session_id,
            utterance: output.utterance,
            stage: output.stage,
            done: output.done,
            completion: output.completion,
        }
    }
}

/// Stored session, replayed
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: SessionId,
    pub stage: Stage,
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<CompletionSignal>,
    pub profile: LeadProfile,
    pub transcript: Transcript,
}

impl From<SessionStatus> for SessionResponse {
    fn from(status: SessionStatus) -> Self {
        Self {
            session_id: status.session_id,
            stage: status.stage,
            done: status.done,
            completion: status.completion,
            profile: status.profile,
            transcript: status.transcript,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
