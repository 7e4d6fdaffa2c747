//! Interview state reconstruction
//!
//! The orchestrator keeps no per-conversation state between calls. Stage,
//! profile and completion are recomputed from the transcript every time.

use super::profile::{LeadProfile, assess_reply};
use super::stage::Stage;
use super::termination::{CompletionSignal, TerminationPolicy};
use crate::conversation::entities::Role;
use crate::conversation::transcript::Transcript;
use serde::{Deserialize, Serialize};

/// Where an interview stands after a given transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewState {
    pub stage: Stage,
    pub profile: LeadProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<CompletionSignal>,
}

impl Default for InterviewState {
    fn default() -> Self {
        Self {
            stage: Stage::AwaitingEngagement,
            profile: LeadProfile::default(),
            completion: None,
        }
    }
}

impl InterviewState {
    /// Replay a transcript from the start.
    ///
    /// Each user reply is judged against the stage current at that point;
    /// completion is evaluated after every assistant turn except the
    /// greeting and sticks once set. Replies after completion are ignored.
    pub fn replay(transcript: &Transcript, policy: &TerminationPolicy) -> Self {
        let mut state = Self::default();

        for (index, turn) in transcript.turns().iter().enumerate() {
            match turn.role {
                Role::User => {
                    if state.is_done() {
                        continue;
                    }
                    if let Some(capture) = assess_reply(state.stage, &turn.content) {
                        state.profile.record(&capture);
                        if let Some(next) = state.stage.next() {
                            state.stage = next;
                        }
                    }
                }
                Role::Assistant => {
                    if index > 0 && state.completion.is_none() {
                        state.completion =
                            policy.evaluate(state.stage, index + 1, Some(&turn.content));
                    }
                }
            }
        }

        state
    }

    pub fn is_done(&self) -> bool {
        self.completion.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::entities::Turn;

    fn transcript(turns: &[(&str, &str)]) -> Transcript {
        turns
            .iter()
            .map(|(role, text)| match *role {
                "a" => Turn::assistant(*text),
                _ => Turn::user(*text),
            })
            .collect()
    }

    #[test]
    fn test_empty_transcript_awaits_engagement() {
        let state = InterviewState::replay(&Transcript::new(), &TerminationPolicy::default());
        assert_eq!(state, InterviewState::default());
    }

    #[test]
    fn test_replay_advances_on_sufficient_replies_only() {
        let t = transcript(&[
            ("a", "Shall we start?"),
            ("u", "not yet"),
            ("a", "Say yes when ready."),
            ("u", "yes"),
            ("a", "Organisation and industry?"),
            ("u", "Acme, retail"),
            ("a", "How many employees?"),
            ("u", "lots"),
        ]);
        let state = InterviewState::replay(&t, &TerminationPolicy::default());
        assert_eq!(state.stage, Stage::Scoping);
        assert_eq!(state.profile.organisation.as_deref(), Some("Acme"));
        assert_eq!(state.profile.employee_count, None);
        assert!(!state.is_done());
    }

    #[test]
    fn test_replay_stops_after_completion() {
        let t = transcript(&[
            ("a", "Shall we start?"),
            ("u", "yes"),
            ("a", "Thank you, that is complete."),
            ("u", "Acme, retail"),
        ]);
        let state = InterviewState::replay(&t, &TerminationPolicy::default());
        assert_eq!(state.completion, Some(CompletionSignal::ClosingPhrase));
        assert_eq!(state.stage, Stage::Discovery);
        assert!(state.profile.organisation.is_none());
    }

    #[test]
    fn test_greeting_never_completes() {
        let t = transcript(&[("a", "Thank you for visiting! Setup is complete, shall we start?")]);
        let state = InterviewState::replay(&t, &TerminationPolicy::default());
        assert!(!state.is_done());
        assert_eq!(state.stage, Stage::AwaitingEngagement);

        let t = t.with(Turn::user("yes"));
        let state = InterviewState::replay(&t, &TerminationPolicy::default());
        assert_eq!(state.stage, Stage::Discovery);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let t = transcript(&[("a", "Hi"), ("u", "sure"), ("a", "Org?"), ("u", "Initech")]);
        let policy = TerminationPolicy::default();
        assert_eq!(
            InterviewState::replay(&t, &policy),
            InterviewState::replay(&t, &policy)
        );
    }
}
