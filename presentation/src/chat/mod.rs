//! Interactive chat module
//!
//! Provides a line-editor based interview in the terminal.

mod repl;

pub use repl::ChatRepl;
