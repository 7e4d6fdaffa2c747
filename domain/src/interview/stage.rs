//! Interview stages
//!
//! The interview walks a strict linear order of nine stages. A transition
//! always moves exactly one step forward; nothing is skipped or revisited.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// One discrete step of the interview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Greeting sent, waiting for the visitor to opt in
    AwaitingEngagement,
    /// Organisation name and industry
    Discovery,
    /// Employee count
    Scoping,
    /// Email address for the account
    AccountCreation,
    /// Explain the interview and wait for readiness
    InterviewBriefing,
    InterviewQ1,
    InterviewQ2,
    InterviewQ3,
    /// Closing statement; terminal
    ReportDelivery,
}

impl Stage {
    /// Every stage in interview order
    pub const ALL: [Stage; 9] = [
        Stage::AwaitingEngagement,
        Stage::Discovery,
        Stage::Scoping,
        Stage::AccountCreation,
        Stage::InterviewBriefing,
        Stage::InterviewQ1,
        Stage::InterviewQ2,
        Stage::InterviewQ3,
        Stage::ReportDelivery,
    ];

    /// Position in the interview order, starting at 0
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or_default()
    }

    /// The stage after this one, or `None` for the terminal stage
    pub fn next(&self) -> Option<Stage> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::ReportDelivery)
    }

    /// Number of the fixed interview question (1-3), if this is one
    pub fn question_number(&self) -> Option<usize> {
        match self {
            Stage::InterviewQ1 => Some(1),
            Stage::InterviewQ2 => Some(2),
            Stage::InterviewQ3 => Some(3),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::AwaitingEngagement => "AWAITING_ENGAGEMENT",
            Stage::Discovery => "DISCOVERY",
            Stage::Scoping => "SCOPING",
            Stage::AccountCreation => "ACCOUNT_CREATION",
            Stage::InterviewBriefing => "INTERVIEW_BRIEFING",
            Stage::InterviewQ1 => "INTERVIEW_Q1",
            Stage::InterviewQ2 => "INTERVIEW_Q2",
            Stage::InterviewQ3 => "INTERVIEW_Q3",
            Stage::ReportDelivery => "REPORT_DELIVERY",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::AwaitingEngagement => "Awaiting engagement",
            Stage::Discovery => "Discovery",
            Stage::Scoping => "Scoping",
            Stage::AccountCreation => "Account creation",
            Stage::InterviewBriefing => "Interview briefing",
            Stage::InterviewQ1 => "Interview question 1",
            Stage::InterviewQ2 => "Interview question 2",
            Stage::InterviewQ3 => "Interview question 3",
            Stage::ReportDelivery => "Report delivery",
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Stage::AwaitingEngagement
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Stage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        Self::ALL
            .iter()
            .find(|stage| stage.as_str() == normalized)
            .copied()
            .ok_or_else(|| DomainError::UnknownStage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_walks_every_stage_once() {
        let mut stage = Stage::AwaitingEngagement;
        let mut visited = vec![stage];
        while let Some(next) = stage.next() {
            assert_eq!(next.index(), stage.index() + 1);
            stage = next;
            visited.push(stage);
        }
        assert_eq!(visited, Stage::ALL.to_vec());
        assert!(stage.is_terminal());
    }

    #[test]
    fn test_only_report_delivery_is_terminal() {
        let terminal: Vec<_> = Stage::ALL.iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(terminal, vec![&Stage::ReportDelivery]);
    }

    #[test]
    fn test_serde_screaming_snake_case() {
        let json = serde_json::to_string(&Stage::InterviewQ2).unwrap();
        assert_eq!(json, "\"INTERVIEW_Q2\"");
        let stage: Stage = serde_json::from_str("\"ACCOUNT_CREATION\"").unwrap();
        assert_eq!(stage, Stage::AccountCreation);
    }

    #[test]
    fn test_from_str_is_lenient_on_case_and_separators() {
        assert_eq!("interview-q1".parse::<Stage>().unwrap(), Stage::InterviewQ1);
        assert_eq!("report delivery".parse::<Stage>().unwrap(), Stage::ReportDelivery);
        assert!("LOBBY".parse::<Stage>().is_err());
    }

    #[test]
    fn test_question_numbers() {
        assert_eq!(Stage::InterviewQ3.question_number(), Some(3));
        assert_eq!(Stage::Scoping.question_number(), None);
    }
}
