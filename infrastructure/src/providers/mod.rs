//! Language-model gateways
//!
//! [`build_gateway`] turns the `[providers]` section into a single
//! [`LlmGateway`], wrapping the primary and fallback in a
//! [`FallbackGateway`] when both are configured.

pub mod anthropic;
pub mod fallback;
pub mod openai;
pub mod scripted;

pub use anthropic::{AnthropicGateway, AnthropicSettings};
pub use fallback::FallbackGateway;
pub use openai::{OpenAiGateway, OpenAiSettings};
pub use scripted::ScriptedGateway;

use crate::config::{FileProvidersConfig, ProviderKind};
use interview_application::ports::llm_gateway::{GatewayError, LlmGateway};
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::info;

/// Build the configured gateway; `offline` forces the scripted one
pub fn build_gateway(
    config: &FileProvidersConfig,
    offline: bool,
) -> Result<Arc<dyn LlmGateway>, GatewayError> {
    if offline {
        return Ok(Arc::new(ScriptedGateway));
    }

    let primary = build_one(config, config.parse_default().0)?;
    let gateway = match config.parse_fallback().0 {
        Some(kind) => {
            let secondary = build_one(config, kind)?;
            Arc::new(FallbackGateway::new(primary, secondary)) as Arc<dyn LlmGateway>
        }
        None => primary,
    };
    info!("Using language model gateway: {}", gateway.name());
    Ok(gateway)
}

fn build_one(
    config: &FileProvidersConfig,
    kind: ProviderKind,
) -> Result<Arc<dyn LlmGateway>, GatewayError> {
    Ok(match kind {
        ProviderKind::OpenAi => {
            let c = &config.openai;
            Arc::new(OpenAiGateway::new(OpenAiSettings {
                api_key: resolve_api_key(c.api_key.as_ref(), &c.api_key_env)?,
                base_url: c.base_url.clone(),
                model: c.model.clone(),
                max_tokens: c.max_tokens,
                temperature: c.temperature,
            }))
        }
        ProviderKind::Anthropic => {
            let c = &config.anthropic;
            Arc::new(AnthropicGateway::new(AnthropicSettings {
                api_key: resolve_api_key(c.api_key.as_ref(), &c.api_key_env)?,
                base_url: c.base_url.clone(),
                model: c.model.clone(),
                max_tokens: c.max_tokens,
                api_version: c.api_version.clone(),
                temperature: c.temperature,
            }))
        }
        ProviderKind::Scripted => Arc::new(ScriptedGateway),
    })
}

fn resolve_api_key(inline: Option<&String>, env: &str) -> Result<String, GatewayError> {
    inline
        .cloned()
        .or_else(|| std::env::var(env).ok())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| GatewayError::MissingCredentials(env.to_string()))
}

/// Map a non-success HTTP status to a gateway error
pub(crate) fn map_status(provider: &str, status: StatusCode, body: &str, model: &str) -> GatewayError {
    let detail = format!("{} API error {}: {}", provider, status, body.trim());
    match status {
        StatusCode::TOO_MANY_REQUESTS => GatewayError::RateLimited(detail),
        StatusCode::NOT_FOUND => GatewayError::ModelNotAvailable(model.to_string()),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            GatewayError::RequestFailed(format!("{} rejected the API key", provider))
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GatewayError::Timeout,
        _ => GatewayError::RequestFailed(detail),
    }
}

pub(crate) fn map_send_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::ConnectionError(e.to_string())
    }
}
