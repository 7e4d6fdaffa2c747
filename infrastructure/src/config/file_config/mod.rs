//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod interview;
mod providers;
mod server;
mod services;

pub use interview::FileInterviewConfig;
pub use providers::{FileAnthropicConfig, FileOpenAiConfig, FileProvidersConfig, ProviderKind};
pub use server::{FileLoggingConfig, FileServerConfig};
pub use services::{FileAccountsConfig, FileReportsConfig, FileStoreConfig, StoreBackend};

use interview_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Stage machine and persona settings
    pub interview: FileInterviewConfig,
    /// Language-model providers
    pub providers: FileProvidersConfig,
    /// Transcript storage
    pub store: FileStoreConfig,
    /// Account creation at the email stage
    pub accounts: FileAccountsConfig,
    /// Report trigger on completion
    pub reports: FileReportsConfig,
    pub server: FileServerConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. Credential
    /// checks read the environment.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.interview.to_behavior_config().1);

        issues.extend(self.providers.parse_default().1);
        issues.extend(self.providers.parse_fallback().1);
        issues.extend(self.providers.check_credentials());

        issues.extend(self.store.parse_backend().1);
        issues.extend(self.accounts.validate());
        issues.extend(self.reports.validate());
        issues.extend(self.server.validate());

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[interview]
max_turns = 30
timeout_seconds = 20

[interview.persona]
assistant_name = "Sam"

[providers]
default = "anthropic"
fallback = "openai"

[providers.anthropic]
model = "claude-3-5-sonnet-latest"

[store]
backend = "rest"
url = "https://db.example.com/rest/v1"

[reports]
endpoint = "https://reports.example.com/generate"

[server]
bind = "0.0.0.0:9000"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.interview.max_turns, 30);
        assert_eq!(config.interview.persona.assistant_name, "Sam");
        assert_eq!(config.interview.persona.company_name, "Northstar Advisory");
        assert_eq!(config.providers.parse_default().0, ProviderKind::Anthropic);
        assert_eq!(config.providers.anthropic.model, "claude-3-5-sonnet-latest");
        assert_eq!(config.store.parse_backend().0, StoreBackend::Rest);
        assert_eq!(config.store.table, "interview_turns");
        assert_eq!(config.server.bind, "0.0.0.0:9000");
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[server]\nbind = \"[::]:80\"\n").unwrap();
        assert_eq!(config.server.bind, "[::]:80");
        // Defaults should apply
        assert_eq!(config.interview.max_turns, 28);
        assert_eq!(config.providers.default, "openai");
        assert_eq!(config.store.backend, "memory");
    }

    #[test]
    fn test_validate_offline_config() {
        let config = FileConfig {
            providers: FileProvidersConfig {
                default: "scripted".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_collects_every_issue() {
        let toml_str = r#"
[providers]
default = "scripted"
fallback = "mystery"

[store]
backend = "rest"

[server]
bind = ""
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| i.is_error()));
    }
}
