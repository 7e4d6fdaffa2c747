//! Interviewer persona

use serde::{Deserialize, Serialize};

/// Who the visitor is talking to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    /// Name the assistant introduces itself with
    pub assistant_name: String,
    /// Company running the funnel
    pub company_name: String,
    /// What the visitor receives at the end
    pub report_name: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            assistant_name: "Ava".to_string(),
            company_name: "Northstar Advisory".to_string(),
            report_name: "AI readiness report".to_string(),
        }
    }
}
