//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for interview-funnel
#[derive(Parser, Debug)]
#[command(name = "interview-funnel")]
#[command(author, version, about = "Conversational lead-qualification interview")]
#[command(long_about = r#"
Interview Funnel walks a website visitor through a short structured interview
and hands the finished transcript to a report generator.

The interview has nine stages:
  AWAITING_ENGAGEMENT -> DISCOVERY -> SCOPING -> ACCOUNT_CREATION ->
  INTERVIEW_BRIEFING -> INTERVIEW_Q1 -> INTERVIEW_Q2 -> INTERVIEW_Q3 ->
  REPORT_DELIVERY

Configuration is loaded from (in priority order):
1. FUNNEL_* environment variables (FUNNEL_SERVER__BIND=0.0.0.0:8080)
2. --config <path>     Explicit config file
3. ./funnel.toml       Project-level config
4. ~/.config/interview-funnel/config.toml   Global config

Example:
  interview-funnel serve --bind 0.0.0.0:8080
  interview-funnel chat --offline
  interview-funnel replay transcript.json --json
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        /// Address to listen on (overrides [server] bind)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Run an interview in the terminal
    Chat {
        /// Use canned stage messages instead of a language model
        #[arg(long)]
        offline: bool,

        /// Suppress progress indicators
        #[arg(short, long)]
        quiet: bool,
    },

    /// Replay a transcript file and print where the interview stands
    Replay {
        /// JSON array of {"role", "content"} turns
        file: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show configuration file locations and the merged configuration
    ShowConfig,
}
