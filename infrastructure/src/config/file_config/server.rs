//! Server and logging configuration from TOML (`[server]`, `[logging]`)

use interview_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub bind: String,
    /// Longest accepted visitor reply, in characters
    pub max_content_chars: usize,
    /// Longest accepted history on the stateless endpoint
    pub max_history_turns: usize,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            max_content_chars: 4000,
            max_history_turns: 200,
        }
    }
}

impl FileServerConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.bind.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "server.bind".to_string(),
                },
                "server.bind cannot be empty",
            ));
        }
        for (field, value) in [
            ("server.max_content_chars", self.max_content_chars),
            ("server.max_history_turns", self.max_history_turns),
        ] {
            if value == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::OutOfRange {
                        field: field.to_string(),
                        value: "0".to_string(),
                    },
                    format!("{} must be greater than 0", field),
                ));
            }
        }
        issues
    }
}

/// Raw logging configuration
///
/// ```toml
/// [logging]
/// dir = "/var/log/interview-funnel"     # daily rolling operation log
/// conversation_log = "interviews.jsonl" # structured interview events
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for the rolling operation log; unset logs to stderr only
    pub dir: Option<String>,
    /// JSONL file receiving conversation events
    pub conversation_log: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server_is_valid() {
        assert!(FileServerConfig::default().validate().is_empty());
    }

    #[test]
    fn test_zero_limits_are_errors() {
        let config = FileServerConfig {
            max_content_chars: 0,
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
    }
}
