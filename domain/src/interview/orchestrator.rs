//! Interview orchestrator
//!
//! Pure decision logic for one turn. Given the full history and the stage
//! the caller believes it is at, [`InterviewOrchestrator::plan_turn`] decides
//! the stage transition and which directive the next assistant utterance must
//! follow. After the utterance has been generated,
//! [`InterviewOrchestrator::conclude`] decides whether the interview is done.
//! Everything with side effects (model call, account creation, report
//! trigger) lives in the application layer.

use super::email::EmailAddress;
use super::profile::{Capture, LeadProfile, assess_reply};
use super::stage::Stage;
use super::state::InterviewState;
use super::termination::{CompletionSignal, TerminationPolicy};
use crate::conversation::entities::Role;
use crate::conversation::transcript::Transcript;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// What the next assistant utterance has to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "stage", rename_all = "snake_case")]
pub enum Directive {
    /// The fixed opening message; no model call
    Greeting,
    /// Ask the stage's canned question for the first time
    Ask(Stage),
    /// The reply was not sufficient; ask again
    Reask(Stage),
    /// Closing statement
    Close,
}

impl Directive {
    pub fn needs_generation(&self) -> bool {
        !matches!(self, Directive::Greeting)
    }
}

/// Decision for one turn, before the utterance exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnPlan {
    /// Stage the user reply answered
    pub from: Stage,
    /// Stage after the reply
    pub to: Stage,
    pub capture: Option<Capture>,
    pub directive: Directive,
    /// Profile including this turn's capture
    pub profile: LeadProfile,
    /// Transcript length once the assistant utterance is appended
    pub turn_count: usize,
}

impl TurnPlan {
    pub fn advanced(&self) -> bool {
        self.from != self.to
    }

    /// Email to open an account with, set only on the
    /// ACCOUNT_CREATION → INTERVIEW_BRIEFING transition
    pub fn account_email(&self) -> Option<&EmailAddress> {
        match (&self.capture, self.from, self.to) {
            (Some(Capture::Email(email)), Stage::AccountCreation, Stage::InterviewBriefing) => {
                Some(email)
            }
            _ => None,
        }
    }
}

/// Result of one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub utterance: String,
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<CompletionSignal>,
}

impl TurnOutcome {
    pub fn done(&self) -> bool {
        self.completion.is_some()
    }
}

/// Drives the interview state machine
#[derive(Debug, Clone, Default)]
pub struct InterviewOrchestrator {
    policy: TerminationPolicy,
}

impl InterviewOrchestrator {
    pub fn new(policy: TerminationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &TerminationPolicy {
        &self.policy
    }

    /// Rebuild the interview state from a stored transcript
    pub fn replay(&self, transcript: &Transcript) -> InterviewState {
        InterviewState::replay(transcript, &self.policy)
    }

    /// Decide the next turn.
    ///
    /// An empty history yields the greeting. Otherwise the history must
    /// alternate assistant/user starting with the assistant and end with the
    /// user reply to judge, and `stage` must match what replaying everything
    /// before that reply produces.
    pub fn plan_turn(&self, history: &Transcript, stage: Stage) -> Result<TurnPlan, DomainError> {
        if history.is_empty() {
            if stage != Stage::AwaitingEngagement {
                return Err(DomainError::StageMismatch {
                    expected: Stage::AwaitingEngagement,
                    supplied: stage,
                });
            }
            return Ok(TurnPlan {
                from: Stage::AwaitingEngagement,
                to: Stage::AwaitingEngagement,
                capture: None,
                directive: Directive::Greeting,
                profile: LeadProfile::default(),
                turn_count: 1,
            });
        }

        Self::check_alternation(history)?;

        let reply = history
            .last()
            .filter(|turn| turn.role == Role::User)
            .ok_or_else(|| {
                DomainError::InvalidHistory("history must end with a user reply".to_string())
            })?;

        let prior = history.without_last().unwrap_or_default();
        let state = self.replay(&prior);
        if state.stage != stage {
            return Err(DomainError::StageMismatch {
                expected: state.stage,
                supplied: stage,
            });
        }
        if state.is_done() {
            return Err(DomainError::AlreadyComplete);
        }

        let capture = assess_reply(stage, &reply.content);
        let to = match &capture {
            Some(_) => stage.next().unwrap_or(stage),
            None => stage,
        };

        let mut profile = state.profile;
        if let Some(capture) = &capture {
            profile.record(capture);
        }

        let turn_count = history.turn_count() + 1;
        let directive = if self.policy.closes_at(to, turn_count) {
            Directive::Close
        } else if to != stage {
            Directive::Ask(to)
        } else {
            Directive::Reask(stage)
        };

        Ok(TurnPlan {
            from: stage,
            to,
            capture,
            directive,
            profile,
            turn_count,
        })
    }

    /// Attach the generated utterance and decide completion
    pub fn conclude(&self, plan: &TurnPlan, utterance: impl Into<String>) -> TurnOutcome {
        let utterance = utterance.into();
        let completion = match plan.directive {
            Directive::Greeting => None,
            _ => self
                .policy
                .evaluate(plan.to, plan.turn_count, Some(&utterance)),
        };
        TurnOutcome {
            utterance,
            stage: plan.to,
            completion,
        }
    }

    fn check_alternation(history: &Transcript) -> Result<(), DomainError> {
        for (index, turn) in history.turns().iter().enumerate() {
            let expected = if index % 2 == 0 {
                Role::Assistant
            } else {
                Role::User
            };
            if turn.role != expected {
                return Err(DomainError::InvalidHistory(format!(
                    "turn {} should be from the {}, found {}",
                    index, expected, turn.role
                )));
            }
        }
        Ok(())
    }
}
