//! Anthropic messages gateway

use super::{map_send_error, map_status};
use async_trait::async_trait;
use interview_application::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use reqwest::Client;
use serde_json::{Value, json};
use tracing::debug;

/// Settings for [`AnthropicGateway`]
#[derive(Debug, Clone)]
pub struct AnthropicSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub api_version: String,
    pub temperature: f32,
}

pub struct AnthropicGateway {
    client: Client,
    settings: AnthropicSettings,
}

impl AnthropicGateway {
    pub fn new(settings: AnthropicSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/messages", self.settings.base_url.trim_end_matches('/'))
    }

    /// The messages API takes the system prompt separately and needs the
    /// conversation to open with a user turn, so a leading assistant
    /// greeting is prefixed with a placeholder user turn.
    fn request_body(&self, request: &GenerationRequest) -> Value {
        let mut messages = Vec::with_capacity(request.history.len() + 1);
        if request.history.first().is_some_and(|t| t.is_assistant()) {
            messages.push(json!({ "role": "user", "content": "(visitor opened the chat)" }));
        }
        for turn in &request.history {
            messages.push(json!({
                "role": turn.role.as_str(),
                "content": turn.content,
            }));
        }

        json!({
            "model": self.settings.model,
            "system": request.system_prompt,
            "messages": messages,
            "max_tokens": self.settings.max_tokens,
            "temperature": self.settings.temperature,
        })
    }

    fn extract_text(raw: &Value) -> Result<String, GatewayError> {
        let text: String = raw["content"]
            .as_array()
            .ok_or_else(|| {
                GatewayError::InvalidResponse("No content in Anthropic response".to_string())
            })?
            .iter()
            .filter(|block| block["type"] == "text")
            .filter_map(|block| block["text"].as_str())
            .collect();
        if text.is_empty() {
            return Err(GatewayError::InvalidResponse(
                "Anthropic response had no text blocks".to_string(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl LlmGateway for AnthropicGateway {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        debug!("Anthropic request: model={}", self.settings.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", &self.settings.api_key)
            .header("anthropic-version", &self.settings.api_version)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status("Anthropic", status, &body, &self.settings.model));
        }

        let raw = response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        Self::extract_text(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_domain::Turn;

    fn gateway() -> AnthropicGateway {
        AnthropicGateway::new(AnthropicSettings {
            api_key: "key".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-3-5-haiku-latest".to_string(),
            max_tokens: 400,
            api_version: "2023-06-01".to_string(),
            temperature: 0.7,
        })
    }

    #[test]
    fn test_request_body_opens_with_user_turn() {
        let request = GenerationRequest::new(
            "system",
            "canned",
            vec![Turn::assistant("Hi there"), Turn::user("yes")],
        );
        let body = gateway().request_body(&request);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[1]["content"], "Hi there");
        assert_eq!(body["system"], "system");
    }

    #[test]
    fn test_extract_text_joins_text_blocks() {
        let raw = json!({
            "content": [
                { "type": "text", "text": "Great, " },
                { "type": "text", "text": "thanks!" }
            ]
        });
        assert_eq!(AnthropicGateway::extract_text(&raw).unwrap(), "Great, thanks!");
        assert!(AnthropicGateway::extract_text(&json!({ "content": [] })).is_err());
    }
}
