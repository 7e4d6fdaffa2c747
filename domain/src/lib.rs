//! Domain layer for interview-funnel
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Interview
//!
//! A visitor is walked through nine stages in a fixed order, from the
//! greeting to the closing statement:
//!
//! ```text
//! AWAITING_ENGAGEMENT → DISCOVERY → SCOPING → ACCOUNT_CREATION →
//! INTERVIEW_BRIEFING → INTERVIEW_Q1 → INTERVIEW_Q2 → INTERVIEW_Q3 →
//! REPORT_DELIVERY
//! ```
//!
//! Each user reply either satisfies the current stage (advance one step) or
//! does not (ask again). Nothing is stored here: stage and captured details
//! are recomputed from the transcript on every call.
//!
//! ## Termination
//!
//! The interview is done when the stage machine reaches REPORT_DELIVERY,
//! when the transcript hits the turn ceiling, or (legacy heuristic) when the
//! last assistant message reads like a closing statement.

pub mod config;
pub mod conversation;
pub mod core;
pub mod interview;
pub mod prompt;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use conversation::{
    entities::{Role, Turn},
    transcript::Transcript,
};
pub use core::{error::DomainError, session_id::SessionId};
pub use interview::{
    email::EmailAddress,
    orchestrator::{Directive, InterviewOrchestrator, TurnOutcome, TurnPlan},
    profile::{Capture, InterviewAnswer, LeadProfile, assess_reply},
    stage::Stage,
    state::InterviewState,
    termination::{CompletionSignal, DEFAULT_MAX_TURNS, TerminationPolicy},
};
pub use prompt::{Persona, PromptTemplate};
