//! OpenAI chat-completions gateway

use super::{map_send_error, map_status};
use async_trait::async_trait;
use interview_application::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Instant;
use tracing::debug;

/// Settings for [`OpenAiGateway`]
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

pub struct OpenAiGateway {
    client: Client,
    settings: OpenAiSettings,
}

impl OpenAiGateway {
    pub fn new(settings: OpenAiSettings) -> Self {
        Self {
            client: Client::new(),
            settings,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    fn request_body(&self, request: &GenerationRequest) -> Value {
        let mut messages = vec![json!({
            "role": "system",
            "content": request.system_prompt,
        })];
        for turn in &request.history {
            messages.push(json!({
                "role": turn.role.as_str(),
                "content": turn.content,
            }));
        }

        json!({
            "model": self.settings.model,
            "messages": messages,
            "max_tokens": self.settings.max_tokens,
            "temperature": self.settings.temperature,
        })
    }

    fn extract_text(raw: &Value) -> Result<String, GatewayError> {
        raw["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| GatewayError::InvalidResponse("No content in OpenAI response".to_string()))
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        let start = Instant::now();
        debug!("OpenAI request: model={}", self.settings.model);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.settings.api_key)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status("OpenAI", status, &body, &self.settings.model));
        }

        let raw = response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        debug!(
            "OpenAI response in {}ms, finish_reason={}",
            start.elapsed().as_millis(),
            raw["choices"][0]["finish_reason"].as_str().unwrap_or("?")
        );
        Self::extract_text(&raw)
    }
}
