//! Progress notification port
//!
//! Defines the interface for reporting progress while a turn is processed.

use interview_domain::{CompletionSignal, Directive, Stage};

/// Callback for progress updates during a turn
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console spinner, plain text, nothing).
pub trait TurnProgressNotifier: Send + Sync {
    /// Called before the model is asked for the next utterance
    fn on_generation_start(&self, directive: &Directive);

    /// Called when the model call finishes
    fn on_generation_complete(&self, success: bool);

    /// Called when the stage moved forward
    fn on_stage_advanced(&self, from: Stage, to: Stage);

    /// Called on the turn the interview becomes done
    fn on_interview_complete(&self, _signal: CompletionSignal) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl TurnProgressNotifier for NoProgress {
    fn on_generation_start(&self, _directive: &Directive) {}
    fn on_generation_complete(&self, _success: bool) {}
    fn on_stage_advanced(&self, _from: Stage, _to: Stage) {}
}
