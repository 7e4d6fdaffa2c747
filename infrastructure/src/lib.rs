//! Infrastructure layer for interview-funnel
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod accounts;
pub mod config;
pub mod logging;
pub mod providers;
pub mod reports;
pub mod store;

// Re-export commonly used types
pub use accounts::AuthAccountService;
pub use config::{ConfigLoader, FileConfig, ProviderKind, StoreBackend};
pub use logging::JsonlConversationLogger;
pub use providers::{
    AnthropicGateway, FallbackGateway, OpenAiGateway, ScriptedGateway, build_gateway,
};
pub use reports::HttpReportGenerator;
pub use store::{InMemoryConversationStore, RestConversationStore};
