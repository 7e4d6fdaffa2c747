//! Conversation subdomain: who said what, in arrival order.
//!
//! - [`entities::Turn`]: one `(role, content)` utterance
//! - [`transcript::Transcript`]: the append-only turn log of one interview

pub mod entities;
pub mod transcript;
