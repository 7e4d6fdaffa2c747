//! Interview subdomain: the stage machine and the rules around it.
//!
//! - [`stage::Stage`]: the nine-step linear order
//! - [`reply`] / [`profile`]: judging visitor replies and recording what they say
//! - [`termination::TerminationPolicy`]: when the interview is done
//! - [`state::InterviewState`]: replaying a transcript
//! - [`orchestrator::InterviewOrchestrator`]: per-turn decisions

pub mod email;
pub mod orchestrator;
pub mod profile;
pub mod reply;
pub mod stage;
pub mod state;
pub mod termination;
