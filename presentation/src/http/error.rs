//! Error responses for the HTTP API

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use interview_application::{ConductInterviewError, NextTurnError};
use interview_domain::DomainError;
use serde_json::json;
use tracing::{error, warn};

/// Error body: `{"error": "<code>", "message": "..."}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn unprocessable(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, code, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, code, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("{}", self);
        }
        let body = json!({ "error": self.code, "message": self.message });
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::unprocessable("malformed_request", rejection.body_text())
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::StageMismatch { .. } => Self::conflict("stage_mismatch", e.to_string()),
            DomainError::AlreadyComplete => Self::conflict("already_complete", e.to_string()),
            DomainError::InvalidHistory(_) => Self::unprocessable("invalid_history", e.to_string()),
            DomainError::InvalidSessionId(_) => {
                Self::unprocessable("invalid_session_id", e.to_string())
            }
            DomainError::UnknownStage(_) => Self::unprocessable("unknown_stage", e.to_string()),
        }
    }
}

impl From<NextTurnError> for ApiError {
    fn from(e: NextTurnError) -> Self {
        match e {
            NextTurnError::Domain(e) => e.into(),
            NextTurnError::Generation(e) => {
                warn!("Generation failed: {}", e);
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    "generation_failed",
                    "The interviewer could not produce a reply. Please try again.",
                )
            }
        }
    }
}

impl From<ConductInterviewError> for ApiError {
    fn from(e: ConductInterviewError) -> Self {
        match e {
            ConductInterviewError::SessionNotFound(id) => {
                Self::not_found(format!("Session not found: {}", id))
            }
            ConductInterviewError::SessionExists(id) => {
                Self::conflict("session_exists", format!("Session already started: {}", id))
            }
            ConductInterviewError::Store(e) => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "store_unavailable",
                e.to_string(),
            ),
            ConductInterviewError::Turn(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_application::{GatewayError, StoreError};
    use interview_domain::Stage;

    #[test]
    fn test_status_codes() {
        let cases: Vec<(ApiError, StatusCode)> = vec![
            (
                NextTurnError::Generation(GatewayError::Timeout).into(),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ConductInterviewError::Store(StoreError::Unavailable("down".to_string())).into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                DomainError::StageMismatch {
                    expected: Stage::Discovery,
                    supplied: Stage::Scoping,
                }
                .into(),
                StatusCode::CONFLICT,
            ),
            (DomainError::AlreadyComplete.into(), StatusCode::CONFLICT),
            (
                DomainError::InvalidHistory("x".to_string()).into(),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.status, status, "{}", error);
        }
    }
}
