//! Interview configuration from TOML (`[interview]` section)

use interview_application::BehaviorConfig;
use interview_domain::{ConfigIssue, ConfigIssueCode, DEFAULT_MAX_TURNS, Persona, TerminationPolicy};
use serde::{Deserialize, Serialize};

/// Raw interview configuration from TOML
///
/// # Example
///
/// ```toml
/// [interview]
/// max_turns = 28
/// closing_phrase_heuristic = true
/// timeout_seconds = 45
///
/// [interview.persona]
/// assistant_name = "Ava"
/// company_name = "Northstar Advisory"
/// report_name = "AI readiness report"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileInterviewConfig {
    /// Transcript length at which the interview is forced to close
    pub max_turns: usize,
    /// Also treat "thank you" + "complete" in the last message as done
    pub closing_phrase_heuristic: bool,
    /// Model call timeout; unset disables the timeout
    pub timeout_seconds: Option<u64>,
    pub persona: Persona,
}

impl Default for FileInterviewConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            closing_phrase_heuristic: true,
            timeout_seconds: Some(45),
            persona: Persona::default(),
        }
    }
}

impl FileInterviewConfig {
    /// Convert to the application behavior config, returning issues found on the way.
    pub fn to_behavior_config(&self) -> (BehaviorConfig, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let mut termination = TerminationPolicy::default();
        if self.max_turns < 3 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "interview.max_turns".to_string(),
                    value: self.max_turns.to_string(),
                },
                format!(
                    "interview.max_turns must be at least 3, got {}",
                    self.max_turns
                ),
            ));
        } else {
            termination = termination.with_max_turns(self.max_turns);
        }
        if !self.closing_phrase_heuristic {
            termination = termination.without_closing_phrase_heuristic();
        }

        let mut timeout = self.timeout_seconds;
        if timeout == Some(0) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "interview.timeout_seconds".to_string(),
                    value: "0".to_string(),
                },
                "interview.timeout_seconds is 0, using the default instead",
            ));
            timeout = Self::default().timeout_seconds;
        }

        let persona = &self.persona;
        for (field, value) in [
            ("interview.persona.assistant_name", &persona.assistant_name),
            ("interview.persona.company_name", &persona.company_name),
            ("interview.persona.report_name", &persona.report_name),
        ] {
            if value.trim().is_empty() {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::EmptyValue {
                        field: field.to_string(),
                    },
                    format!("{} is empty; prompts will read oddly", field),
                ));
            }
        }

        let config = BehaviorConfig::from_timeout_seconds(timeout)
            .with_termination(termination)
            .with_persona(persona.clone());
        (config, issues)
    }
}
