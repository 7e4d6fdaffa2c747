//! Offline gateway

use async_trait::async_trait;
use interview_application::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};

/// Replies with the canned text of the current directive, no network needed
#[derive(Debug, Default)]
pub struct ScriptedGateway;

#[async_trait]
impl LlmGateway for ScriptedGateway {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        Ok(request.canned_text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_canned_text() {
        let request = GenerationRequest::new("system", "Which industry?", vec![]);
        assert_eq!(
            ScriptedGateway.generate(&request).await.unwrap(),
            "Which industry?"
        );
    }
}
