//! Conversation stores

pub mod memory;
pub mod rest;

pub use memory::InMemoryConversationStore;
pub use rest::RestConversationStore;
