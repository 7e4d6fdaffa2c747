//! LLM Gateway port
//!
//! Defines the interface for communicating with language-model providers.

use async_trait::async_trait;
use interview_domain::Turn;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Timeout")]
    Timeout,
}

impl GatewayError {
    /// Whether another provider might succeed where this one failed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, GatewayError::MissingCredentials(_))
    }
}

/// One completion request
///
/// `canned_text` is the stage's fixed message; generators that do not call a
/// model (the offline gateway) return it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub canned_text: String,
    pub history: Vec<Turn>,
}

impl GenerationRequest {
    pub fn new(
        system_prompt: impl Into<String>,
        canned_text: impl Into<String>,
        history: Vec<Turn>,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            canned_text: canned_text.into(),
            history,
        }
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Produce the next assistant utterance
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_is_not_retryable() {
        assert!(!GatewayError::MissingCredentials("OPENAI_API_KEY".to_string()).is_retryable());
        assert!(GatewayError::Timeout.is_retryable());
        assert!(GatewayError::RateLimited("429".to_string()).is_retryable());
    }
}
