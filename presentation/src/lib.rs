//! Presentation layer for interview-funnel
//!
//! This crate contains CLI definitions, the HTTP API, output formatters,
//! progress reporters, and the terminal interview.

pub mod chat;
pub mod cli;
pub mod http;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::ChatRepl;
pub use cli::commands::{Cli, Command};
pub use http::{AppState, RequestLimits, router, serve};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
