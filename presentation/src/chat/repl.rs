//! REPL (Read-Eval-Print Loop) for a terminal interview

use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::{ProgressReporter, SimpleProgress};
use colored::Colorize;
use interview_application::{
    ConductInterviewError, ConductInterviewUseCase, NextTurnOutput, TurnProgressNotifier,
};
use interview_domain::{Persona, SessionId};
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};
use std::sync::Arc;

/// Interactive interview in the terminal
pub struct ChatRepl {
    use_case: Arc<ConductInterviewUseCase>,
    persona: Persona,
    session_id: SessionId,
    show_progress: bool,
}

/// What the loop should do after a line
enum Step {
    Continue,
    Finished,
}

impl ChatRepl {
    pub fn new(use_case: Arc<ConductInterviewUseCase>, persona: Persona) -> Self {
        Self {
            use_case,
            persona,
            session_id: SessionId::generate(),
            show_progress: true,
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Run the interview until it completes or the visitor quits
    pub async fn run(&self) -> Result<(), ConductInterviewError> {
        self.print_welcome();

        let opening = self
            .use_case
            .start_with_progress(self.session_id.clone(), self.progress().as_ref())
            .await?;
        self.print_turn(&opening);

        let mut line_editor = Reedline::create();
        loop {
            let prompt = DefaultPrompt::new(
                DefaultPromptSegment::Basic("you".to_string()),
                DefaultPromptSegment::Empty,
            );

            match line_editor.read_line(&prompt) {
                Ok(Signal::Success(buffer)) => {
                    let line = buffer.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let step = if line.starts_with('/') {
                        self.handle_command(line).await
                    } else {
                        self.process_reply(line).await
                    };
                    if let Step::Finished = step {
                        break;
                    }
                }
                Ok(Signal::CtrlC) => {
                    println!("^C");
                    continue;
                }
                Ok(Signal::CtrlD) => {
                    println!("Bye!");
                    break;
                }
                Ok(_) => break,
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        Ok(())
    }

    fn progress(&self) -> Box<dyn TurnProgressNotifier> {
        if self.show_progress {
            Box::new(ProgressReporter::new())
        } else {
            Box::new(SimpleProgress)
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│        Interview Funnel - Chat Mode         │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Session: {}", self.session_id);
        println!();
        println!("Commands:");
        println!("  /stage       - Show the current stage and captured details");
        println!("  /transcript  - Show the conversation so far");
        println!("  /quit        - Exit");
        println!();
    }

    fn print_turn(&self, output: &NextTurnOutput) {
        println!();
        println!(
            "{} {}",
            ConsoleFormatter::stage_badge(output.stage).dimmed(),
            ConsoleFormatter::assistant(&self.persona.assistant_name, &output.utterance)
        );
        println!();
    }

    async fn handle_command(&self, cmd: &str) -> Step {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                Step::Finished
            }
            "/stage" | "/status" => {
                match self.use_case.status(self.session_id.clone()).await {
                    Ok(status) => println!("{}", ConsoleFormatter::status(&status)),
                    Err(e) => eprintln!("Error: {}", e),
                }
                Step::Continue
            }
            "/transcript" => {
                match self.use_case.status(self.session_id.clone()).await {
                    Ok(status) => print!(
                        "{}",
                        ConsoleFormatter::transcript(
                            &status.transcript,
                            &self.persona.assistant_name
                        )
                    ),
                    Err(e) => eprintln!("Error: {}", e),
                }
                Step::Continue
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /stage, /status      - Show the current stage");
                println!("  /transcript          - Show the conversation so far");
                println!("  /quit, /exit, /q     - Exit");
                println!();
                Step::Continue
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                Step::Continue
            }
        }
    }

    async fn process_reply(&self, reply: &str) -> Step {
        let progress = self.progress();
        match self
            .use_case
            .reply_with_progress(self.session_id.clone(), reply, progress.as_ref())
            .await
        {
            Ok(output) => {
                self.print_turn(&output);
                if output.done {
                    println!("{}", "The interview is complete.".green().bold());
                    Step::Finished
                } else {
                    Step::Continue
                }
            }
            Err(ConductInterviewError::Turn(e)) if e.is_already_complete() => {
                println!("{}", "The interview is already complete.".yellow());
                Step::Finished
            }
            Err(e) => {
                // nothing was stored, the visitor can simply answer again
                eprintln!("{} {}", "Error:".red().bold(), e);
                Step::Continue
            }
        }
    }
}
