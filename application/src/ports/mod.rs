//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.
//! Every collaborator the interview depends on but does not implement sits
//! behind one of these traits.

pub mod account_service;
pub mod conversation_logger;
pub mod conversation_store;
pub mod llm_gateway;
pub mod progress;
pub mod report_generator;
