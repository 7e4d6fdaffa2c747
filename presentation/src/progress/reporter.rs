//! Progress reporting while a turn is generated

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use interview_application::{TurnProgressNotifier, describe_directive};
use interview_domain::{CompletionSignal, Directive, Stage};
use std::sync::Mutex;
use std::time::Duration;

/// Spinner shown while the model writes the next message
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnProgressNotifier for ProgressReporter {
    fn on_generation_start(&self, directive: &Directive) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix("thinking");
        pb.set_message(describe_directive(directive));
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(pb);
        }
    }

    fn on_generation_complete(&self, success: bool) {
        let Some(pb) = self.spinner.lock().ok().and_then(|mut slot| slot.take()) else {
            return;
        };
        if success {
            pb.finish_and_clear();
        } else {
            pb.abandon_with_message(format!("{}", "generation failed".red()));
        }
    }

    fn on_stage_advanced(&self, from: Stage, to: Stage) {
        SimpleProgress.on_stage_advanced(from, to);
    }

    fn on_interview_complete(&self, signal: CompletionSignal) {
        SimpleProgress.on_interview_complete(signal);
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl TurnProgressNotifier for SimpleProgress {
    fn on_generation_start(&self, _directive: &Directive) {}

    fn on_generation_complete(&self, success: bool) {
        if !success {
            eprintln!("  {} generation failed", "x".red());
        }
    }

    fn on_stage_advanced(&self, from: Stage, to: Stage) {
        println!(
            "  {} {} {} {}",
            "->".cyan(),
            from.display_name().dimmed(),
            "->".dimmed(),
            to.display_name().bold()
        );
    }

    fn on_interview_complete(&self, signal: CompletionSignal) {
        println!("  {} interview complete ({})", "v".green(), signal);
    }
}
