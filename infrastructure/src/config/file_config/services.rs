//! Hosted service configuration from TOML (`[store]`, `[accounts]`, `[reports]`)

use interview_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Where transcripts are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Rest,
}

/// Raw store configuration
///
/// ```toml
/// [store]
/// backend = "rest"
/// url = "https://project.example.co/rest/v1"
/// table = "interview_turns"
/// api_key_env = "INTERVIEW_STORE_KEY"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    /// "memory" or "rest"
    pub backend: String,
    pub url: Option<String>,
    pub table: String,
    pub api_key_env: String,
    pub api_key: Option<String>,
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            url: None,
            table: "interview_turns".to_string(),
            api_key_env: "INTERVIEW_STORE_KEY".to_string(),
            api_key: None,
        }
    }
}

impl FileStoreConfig {
    pub fn parse_backend(&self) -> (StoreBackend, Vec<ConfigIssue>) {
        let backend = match self.backend.trim().to_lowercase().as_str() {
            "memory" => StoreBackend::Memory,
            "rest" => StoreBackend::Rest,
            _ => {
                let issue = ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "store.backend".to_string(),
                        value: self.backend.clone(),
                        valid_values: vec!["memory".to_string(), "rest".to_string()],
                    },
                    format!("store.backend: unknown value '{}'", self.backend),
                );
                return (StoreBackend::Memory, vec![issue]);
            }
        };

        let mut issues = Vec::new();
        if backend == StoreBackend::Rest {
            issues.extend(required_url("store.url", self.url.as_deref()));
            if self.table.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyValue {
                        field: "store.table".to_string(),
                    },
                    "store.table cannot be empty",
                ));
            }
        }
        (backend, issues)
    }

    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_ref(), &self.api_key_env)
    }
}

/// Raw account service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAccountsConfig {
    pub enabled: bool,
    /// Base URL of the auth admin API
    pub auth_url: Option<String>,
    pub api_key_env: String,
    pub api_key: Option<String>,
}

impl Default for FileAccountsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            auth_url: None,
            api_key_env: "INTERVIEW_AUTH_KEY".to_string(),
            api_key: None,
        }
    }
}

impl FileAccountsConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        if !self.enabled {
            return vec![];
        }
        required_url("accounts.auth_url", self.auth_url.as_deref())
            .into_iter()
            .collect()
    }

    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_ref(), &self.api_key_env)
    }
}

/// Raw report generator configuration
///
/// Reports are disabled while `endpoint` is unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReportsConfig {
    pub endpoint: Option<String>,
    pub api_key_env: String,
    pub api_key: Option<String>,
}

impl Default for FileReportsConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key_env: "INTERVIEW_REPORTS_KEY".to_string(),
            api_key: None,
        }
    }
}

impl FileReportsConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        match self.endpoint.as_deref() {
            Some(url) => check_url("reports.endpoint", url).into_iter().collect(),
            None => vec![],
        }
    }

    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(self.api_key.as_ref(), &self.api_key_env)
    }
}

fn resolve_key(inline: Option<&String>, env: &str) -> Option<String> {
    inline
        .cloned()
        .or_else(|| std::env::var(env).ok())
        .filter(|key| !key.is_empty())
}

fn required_url(field: &str, url: Option<&str>) -> Option<ConfigIssue> {
    match url {
        Some(url) => check_url(field, url),
        None => Some(ConfigIssue::error(
            ConfigIssueCode::EmptyValue {
                field: field.to_string(),
            },
            format!("{} must be set", field),
        )),
    }
}

fn check_url(field: &str, url: &str) -> Option<ConfigIssue> {
    if url.starts_with("http://") || url.starts_with("https://") {
        return None;
    }
    Some(ConfigIssue::error(
        ConfigIssueCode::InvalidUrl {
            field: field.to_string(),
            value: url.to_string(),
        },
        format!("{}: '{}' is not an http(s) URL", field, url),
    ))
}
