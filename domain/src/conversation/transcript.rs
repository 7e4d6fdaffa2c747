//! Append-only transcript of one interview

use super::entities::{Role, Turn};
use serde::{Deserialize, Serialize};

/// Ordered turn log of one interview (Entity)
///
/// Grows monotonically: there is no API to remove or rewrite a turn.
/// Serialises as a plain JSON array of turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_turns(turns: Vec<Turn>) -> Self {
        Self { turns }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Returns a copy with `turn` appended.
    pub fn with(&self, turn: Turn) -> Self {
        let mut next = self.clone();
        next.push(turn);
        next
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn into_turns(self) -> Vec<Turn> {
        self.turns
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Most recent assistant utterance
    pub fn last_assistant(&self) -> Option<&str> {
        self.last_of(Role::Assistant)
    }

    /// Most recent user reply
    pub fn last_user(&self) -> Option<&str> {
        self.last_of(Role::User)
    }

    /// All user replies, in order
    pub fn user_replies(&self) -> impl Iterator<Item = &str> {
        self.turns
            .iter()
            .filter(|t| t.is_user())
            .map(|t| t.content.as_str())
    }

    /// The transcript without its final turn, or `None` when empty
    pub fn without_last(&self) -> Option<Transcript> {
        if self.turns.is_empty() {
            return None;
        }
        Some(Self::from_turns(self.turns[..self.turns.len() - 1].to_vec()))
    }

    fn last_of(&self, role: Role) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == role)
            .map(|t| t.content.as_str())
    }
}

impl From<Vec<Turn>> for Transcript {
    fn from(turns: Vec<Turn>) -> Self {
        Self::from_turns(turns)
    }
}

impl FromIterator<Turn> for Transcript {
    fn from_iter<I: IntoIterator<Item = Turn>>(iter: I) -> Self {
        Self::from_turns(iter.into_iter().collect())
    }
}
