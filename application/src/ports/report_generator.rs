//! Report generator port
//!
//! Fired once per interview when it completes. The trigger is
//! fire-and-forget: nobody waits for it and failures are only logged.

use async_trait::async_trait;
use interview_domain::{LeadProfile, SessionId, Transcript};
use serde::Serialize;
use thiserror::Error;

/// Errors reported by the report generator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("Report generator unavailable: {0}")]
    Unavailable(String),

    #[error("Report generator rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Everything the report generator needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRequest {
    pub session_id: SessionId,
    pub transcript: Transcript,
    pub profile: LeadProfile,
}

#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn trigger(&self, request: &ReportRequest) -> Result<(), ReportError>;
}

/// Report generator that discards requests, for offline runs
pub struct NoReportGenerator;

#[async_trait]
impl ReportGenerator for NoReportGenerator {
    async fn trigger(&self, _request: &ReportRequest) -> Result<(), ReportError> {
        Ok(())
    }
}
