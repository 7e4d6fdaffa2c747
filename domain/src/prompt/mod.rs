//! Prompt domain
//!
//! Canned stage messages and the system instruction used to generate each
//! assistant utterance.

mod persona;
mod template;

pub use persona::Persona;
pub use template::PromptTemplate;
