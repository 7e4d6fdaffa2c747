//! Provider configuration from TOML (`[providers]` section)

use interview_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Which language-model backend produces the utterances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    /// Offline: canned text, no network
    Scripted,
}

impl ProviderKind {
    pub const NAMES: [&'static str; 3] = ["openai", "anthropic", "scripted"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Scripted => "scripted",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "open-ai" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "scripted" | "offline" => Ok(ProviderKind::Scripted),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

/// Anthropic API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAnthropicConfig {
    /// Environment variable name for the API key (default: "ANTHROPIC_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL for the Anthropic API.
    pub base_url: String,
    pub model: String,
    /// Max tokens per utterance.
    pub max_tokens: u32,
    /// Anthropic API version header.
    pub api_version: String,
    pub temperature: f32,
}

impl Default for FileAnthropicConfig {
    fn default() -> Self {
        Self {
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.anthropic.com".to_string(),
            model: "claude-3-5-haiku-latest".to_string(),
            max_tokens: 400,
            api_version: "2023-06-01".to_string(),
            temperature: 0.7,
        }
    }
}

/// OpenAI API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL for the OpenAI API (can be overridden for compatible servers).
    pub base_url: String,
    pub model: String,
    /// Max tokens per utterance.
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 400,
            temperature: 0.7,
        }
    }
}

/// Raw provider configuration from TOML
///
/// # Example
///
/// ```toml
/// [providers]
/// default = "openai"
/// fallback = "anthropic"
///
/// [providers.openai]
/// model = "gpt-4o-mini"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Primary provider: "openai", "anthropic" or "scripted".
    pub default: String,
    /// Provider tried once when the primary fails.
    pub fallback: Option<String>,
    pub openai: FileOpenAiConfig,
    pub anthropic: FileAnthropicConfig,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            default: "openai".to_string(),
            fallback: None,
            openai: FileOpenAiConfig::default(),
            anthropic: FileAnthropicConfig::default(),
        }
    }
}

impl FileProvidersConfig {
    /// Parse the primary provider, falling back to scripted on failure.
    pub fn parse_default(&self) -> (ProviderKind, Vec<ConfigIssue>) {
        match self.default.parse::<ProviderKind>() {
            Ok(kind) => (kind, vec![]),
            Err(_) => (
                ProviderKind::Scripted,
                vec![Self::unknown_provider("providers.default", &self.default)],
            ),
        }
    }

    /// Parse the fallback provider; an unknown name disables the fallback.
    pub fn parse_fallback(&self) -> (Option<ProviderKind>, Vec<ConfigIssue>) {
        match self.fallback.as_deref() {
            None => (None, vec![]),
            Some(name) => match name.parse::<ProviderKind>() {
                Ok(kind) => (Some(kind), vec![]),
                Err(_) => (None, vec![Self::unknown_provider("providers.fallback", name)]),
            },
        }
    }

    /// Warn about selected providers with no API key anywhere.
    pub fn check_credentials(&self) -> Vec<ConfigIssue> {
        let mut selected = vec![self.parse_default().0];
        if let (Some(kind), _) = self.parse_fallback() {
            selected.push(kind);
        }

        selected
            .into_iter()
            .filter_map(|kind| {
                let (key, env) = match kind {
                    ProviderKind::OpenAi => (&self.openai.api_key, &self.openai.api_key_env),
                    ProviderKind::Anthropic => {
                        (&self.anthropic.api_key, &self.anthropic.api_key_env)
                    }
                    ProviderKind::Scripted => return None,
                };
                if key.is_some() || std::env::var(env).is_ok_and(|v| !v.is_empty()) {
                    return None;
                }
                Some(ConfigIssue::warning(
                    ConfigIssueCode::MissingCredential {
                        provider: kind.as_str().to_string(),
                        env_var: env.clone(),
                    },
                    format!("No API key for {}: set {}", kind.as_str(), env),
                ))
            })
            .collect()
    }

    fn unknown_provider(field: &str, value: &str) -> ConfigIssue {
        ConfigIssue::error(
            ConfigIssueCode::InvalidEnumValue {
                field: field.to_string(),
                value: value.to_string(),
                valid_values: ProviderKind::NAMES.iter().map(|s| s.to_string()).collect(),
            },
            format!("{}: unknown provider '{}'", field, value),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_aliases() {
        assert_eq!("OpenAI".parse::<ProviderKind>(), Ok(ProviderKind::OpenAi));
        assert_eq!("claude".parse::<ProviderKind>(), Ok(ProviderKind::Anthropic));
        assert_eq!("offline".parse::<ProviderKind>(), Ok(ProviderKind::Scripted));
        assert!("mistral".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_unknown_default_is_an_error() {
        let config = FileProvidersConfig {
            default: "mistral".to_string(),
            ..Default::default()
        };
        let (kind, issues) = config.parse_default();
        assert_eq!(kind, ProviderKind::Scripted);
        assert!(issues[0].is_error());
    }

    #[test]
    fn test_fallback_is_optional() {
        let (kind, issues) = FileProvidersConfig::default().parse_fallback();
        assert!(kind.is_none());
        assert!(issues.is_empty());

        let config = FileProvidersConfig {
            fallback: Some("anthropic".to_string()),
            ..Default::default()
        };
        assert_eq!(config.parse_fallback().0, Some(ProviderKind::Anthropic));
    }

    #[test]
    fn test_inline_key_satisfies_credentials() {
        let mut config = FileProvidersConfig::default();
        config.openai.api_key = Some("sk-test".to_string());
        assert!(config.check_credentials().is_empty());

        let scripted = FileProvidersConfig {
            default: "scripted".to_string(),
            ..Default::default()
        };
        assert!(scripted.check_credentials().is_empty());
    }
}
