//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave,
//! such as model timeouts, the termination policy and the interviewer persona.

use interview_domain::{Persona, TerminationPolicy};
use std::time::Duration;

/// Default time allowed for one model completion
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 45;

/// Application behavior configuration.
///
/// Controls runtime behavior of the interview use cases.
#[derive(Debug, Clone)]
pub struct BehaviorConfig {
    /// Maximum time to wait for a model response before timing out.
    pub timeout: Option<Duration>,
    /// When the interview counts as done.
    pub termination: TerminationPolicy,
    /// Who the visitor is talking to.
    pub persona: Persona,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS)),
            termination: TerminationPolicy::default(),
            persona: Persona::default(),
        }
    }
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig from an optional timeout in seconds.
    ///
    /// If `seconds` is `None`, no timeout is applied.
    pub fn from_timeout_seconds(seconds: Option<u64>) -> Self {
        Self {
            timeout: seconds.map(Duration::from_secs),
            ..Self::default()
        }
    }

    pub fn with_termination(mut self, termination: TerminationPolicy) -> Self {
        self.termination = termination;
        self
    }

    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = persona;
        self
    }
}
