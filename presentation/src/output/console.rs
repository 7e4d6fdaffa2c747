//! Console output for the terminal interview and replay

use colored::Colorize;
use interview_application::SessionStatus;
use interview_domain::{CompletionSignal, InterviewState, Role, Stage, Transcript};

/// Formats interview output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One assistant message, prefixed with the interviewer's name
    pub fn assistant(name: &str, text: &str) -> String {
        format!("{} {}", format!("{}:", name).cyan().bold(), text)
    }

    /// Stage header shown next to the prompt
    pub fn stage_badge(stage: Stage) -> String {
        match stage.question_number() {
            Some(n) => format!("[Q{}/3]", n),
            None => format!("[{}]", stage.display_name()),
        }
    }

    /// Full transcript, one line per turn
    pub fn transcript(transcript: &Transcript, assistant_name: &str) -> String {
        let mut output = String::new();
        for (index, turn) in transcript.turns().iter().enumerate() {
            let who = match turn.role {
                Role::Assistant => assistant_name.cyan().bold(),
                Role::User => "you".green().bold(),
            };
            output.push_str(&format!("{:>3} {}: {}\n", index + 1, who, turn.content));
        }
        output
    }

    /// Where a live session stands
    pub fn status(status: &SessionStatus) -> String {
        let mut output = Self::header("Session");
        output.push_str(&format!(
            "{} {}\n",
            "Session:".cyan().bold(),
            status.session_id
        ));
        output.push_str(&Self::state_lines(
            status.stage,
            status.completion,
            status.turn_count,
            &status.profile.summary_lines(),
        ));
        output
    }

    /// Result of replaying a transcript file
    pub fn replay(state: &InterviewState, turn_count: usize) -> String {
        let mut output = Self::header("Replay");
        output.push_str(&Self::state_lines(
            state.stage,
            state.completion,
            turn_count,
            &state.profile.summary_lines(),
        ));
        output
    }

    fn state_lines(
        stage: Stage,
        completion: Option<CompletionSignal>,
        turn_count: usize,
        profile: &[String],
    ) -> String {
        let mut output = format!(
            "{} {} ({}/{})\n",
            "Stage:".cyan().bold(),
            stage.as_str().bold(),
            stage.index() + 1,
            Stage::ALL.len()
        );
        output.push_str(&format!("{} {}\n", "Turns:".cyan().bold(), turn_count));
        let done = match completion {
            Some(signal) => format!("yes ({})", signal).green().to_string(),
            None => "no".yellow().to_string(),
        };
        output.push_str(&format!("{} {}\n", "Done:".cyan().bold(), done));

        if !profile.is_empty() {
            output.push_str(&format!("\n{}\n", "Captured:".cyan().bold()));
            for line in profile {
                output.push_str(&format!("  * {}\n", line));
            }
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "─".repeat(title.len() + 4);
        format!("{}\n  {}\n{}\n", line.dimmed(), title.bold(), line.dimmed())
    }
}
