//! Core domain concepts shared across all subdomains.
//!
//! - [`session_id::SessionId`]: identifies one interview conversation
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: small text helpers used when logging and prompting

pub mod error;
pub mod session_id;
pub mod string;
