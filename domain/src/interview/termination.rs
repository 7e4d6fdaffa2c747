//! Termination policy
//!
//! Decides when an interview is done. The terminal stage is the
//! authoritative signal: it comes from the state machine and can be
//! recomputed from any stored transcript. The turn ceiling bounds runaway
//! conversations. The closing-phrase check is a legacy heuristic over model
//! prose and is fragile in both directions: a model that thanks the visitor
//! and mentions "complete" early ends the interview, one that paraphrases
//! the closing never triggers it. Keep it switchable.

use super::stage::Stage;
use serde::{Deserialize, Serialize};

/// Default ceiling on transcript length
pub const DEFAULT_MAX_TURNS: usize = 28;

const CLOSING_PHRASES: [&str; 2] = ["thank you", "complete"];

/// Why an interview counts as done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionSignal {
    /// The stage machine reached REPORT_DELIVERY
    TerminalStage,
    /// The transcript hit the turn ceiling
    TurnLimit,
    /// The last assistant utterance matched the closing phrases
    ClosingPhrase,
}

impl CompletionSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionSignal::TerminalStage => "terminal_stage",
            CompletionSignal::TurnLimit => "turn_limit",
            CompletionSignal::ClosingPhrase => "closing_phrase",
        }
    }
}

impl std::fmt::Display for CompletionSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// When to stop the interview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminationPolicy {
    /// Transcript length at which the interview ends regardless of content
    pub max_turns: usize,
    /// Whether the closing-phrase heuristic is consulted
    pub closing_phrase_heuristic: bool,
}

impl Default for TerminationPolicy {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            closing_phrase_heuristic: true,
        }
    }
}

impl TerminationPolicy {
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn without_closing_phrase_heuristic(mut self) -> Self {
        self.closing_phrase_heuristic = false;
        self
    }

    /// Evaluate completion after an assistant turn.
    ///
    /// `turn_count` includes that assistant turn.
    pub fn evaluate(
        &self,
        stage: Stage,
        turn_count: usize,
        last_assistant: Option<&str>,
    ) -> Option<CompletionSignal> {
        if stage.is_terminal() {
            return Some(CompletionSignal::TerminalStage);
        }
        if turn_count >= self.max_turns {
            return Some(CompletionSignal::TurnLimit);
        }
        if self.closing_phrase_heuristic && last_assistant.is_some_and(mentions_closing_phrase) {
            return Some(CompletionSignal::ClosingPhrase);
        }
        None
    }

    /// Whether the next assistant turn must be the closing statement
    pub fn closes_at(&self, stage: Stage, turn_count: usize) -> bool {
        stage.is_terminal() || turn_count >= self.max_turns
    }
}

/// Case-insensitive substring match on every closing phrase
pub fn mentions_closing_phrase(text: &str) -> bool {
    let lowered = text.to_lowercase();
    CLOSING_PHRASES.iter().all(|phrase| lowered.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_limit_wins_regardless_of_content() {
        let policy = TerminationPolicy::default();
        assert_eq!(
            policy.evaluate(Stage::Discovery, 28, Some("What industry are you in?")),
            Some(CompletionSignal::TurnLimit)
        );
        assert_eq!(
            policy.evaluate(Stage::Discovery, 40, None),
            Some(CompletionSignal::TurnLimit)
        );
        assert_eq!(policy.evaluate(Stage::Discovery, 27, Some("Which industry?")), None);
    }

    #[test]
    fn test_closing_phrase_below_limit() {
        let policy = TerminationPolicy::default();
        assert_eq!(
            policy.evaluate(
                Stage::InterviewQ2,
                9,
                Some("Thank You so much, the interview is Complete.")
            ),
            Some(CompletionSignal::ClosingPhrase)
        );
        assert_eq!(
            policy.evaluate(Stage::InterviewQ2, 9, Some("Thank you for that answer.")),
            None
        );
    }

    #[test]
    fn test_heuristic_can_be_disabled() {
        let policy = TerminationPolicy::default().without_closing_phrase_heuristic();
        assert_eq!(
            policy.evaluate(Stage::InterviewQ2, 9, Some("thank you, complete")),
            None
        );
    }

    #[test]
    fn test_terminal_stage_is_done() {
        let policy = TerminationPolicy::default().without_closing_phrase_heuristic();
        assert_eq!(
            policy.evaluate(Stage::ReportDelivery, 3, Some("bye")),
            Some(CompletionSignal::TerminalStage)
        );
    }

    #[test]
    fn test_closes_at() {
        let policy = TerminationPolicy::default().with_max_turns(10);
        assert!(policy.closes_at(Stage::Scoping, 10));
        assert!(!policy.closes_at(Stage::Scoping, 9));
        assert!(policy.closes_at(Stage::ReportDelivery, 2));
    }
}
