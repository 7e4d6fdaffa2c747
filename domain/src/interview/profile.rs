//! Lead profile: what the interview has learned so far

use super::email::EmailAddress;
use super::reply::{self, OrganisationReply};
use super::stage::Stage;
use serde::{Deserialize, Serialize};

/// A detail taken from one sufficient reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// Visitor opted into the interview
    Engaged,
    Organisation(OrganisationReply),
    EmployeeCount(u32),
    Email(EmailAddress),
    /// Visitor is ready for the interview questions
    Ready,
    Answer { question: usize, text: String },
}

/// Judge a reply against the stage it answers.
///
/// `Some` means the reply is sufficient and the stage may advance; `None`
/// keeps the interview where it is. The terminal stage accepts nothing.
pub fn assess_reply(stage: Stage, text: &str) -> Option<Capture> {
    match stage {
        Stage::AwaitingEngagement => reply::is_affirmative(text).then_some(Capture::Engaged),
        Stage::Discovery => reply::read_organisation(text).map(Capture::Organisation),
        Stage::Scoping => reply::read_employee_count(text).map(Capture::EmployeeCount),
        Stage::AccountCreation => reply::read_email(text).map(Capture::Email),
        Stage::InterviewBriefing => reply::is_affirmative(text).then_some(Capture::Ready),
        Stage::InterviewQ1 | Stage::InterviewQ2 | Stage::InterviewQ3 => {
            let question = stage.question_number()?;
            reply::is_substantive(text).then(|| Capture::Answer {
                question,
                text: text.trim().to_string(),
            })
        }
        Stage::ReportDelivery => None,
    }
}

/// Interview answer keyed by question number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewAnswer {
    pub question: usize,
    pub answer: String,
}

/// Details captured from the visitor (Value Object)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organisation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailAddress>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<InterviewAnswer>,
}

impl LeadProfile {
    pub fn record(&mut self, capture: &Capture) {
        match capture {
            Capture::Engaged | Capture::Ready => {}
            Capture::Organisation(org) => {
                self.organisation = Some(org.name.clone());
                self.industry = Some(org.industry.clone());
            }
            Capture::EmployeeCount(count) => self.employee_count = Some(*count),
            Capture::Email(email) => self.email = Some(email.clone()),
            Capture::Answer { question, text } => {
                self.answers.retain(|a| a.question != *question);
                self.answers.push(InterviewAnswer {
                    question: *question,
                    answer: text.clone(),
                });
                self.answers.sort_by_key(|a| a.question);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Short bullet list for prompts and console output
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(org) = &self.organisation {
            lines.push(format!("Organisation: {}", org));
        }
        if let Some(industry) = &self.industry {
            lines.push(format!("Industry: {}", industry));
        }
        if let Some(count) = self.employee_count {
            lines.push(format!("Employees: {}", count));
        }
        if let Some(email) = &self.email {
            lines.push(format!("Email: {}", email));
        }
        for answer in &self.answers {
            lines.push(format!("Answer {}: {}", answer.question, answer.answer));
        }
        lines
    }
}
