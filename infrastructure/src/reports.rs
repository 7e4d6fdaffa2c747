//! Report generation trigger over HTTP

use async_trait::async_trait;
use interview_application::ports::report_generator::{ReportError, ReportGenerator, ReportRequest};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Posts the finished transcript to a report-generation endpoint
///
/// The session id doubles as the `Idempotency-Key`, so a duplicate trigger
/// for the same interview is harmless on the receiving side.
pub struct HttpReportGenerator {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpReportGenerator {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[async_trait]
impl ReportGenerator for HttpReportGenerator {
    async fn trigger(&self, request: &ReportRequest) -> Result<(), ReportError> {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("Idempotency-Key", request.session_id.as_str())
            .json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ReportError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            if status.is_server_error() {
                return Err(ReportError::Unavailable(format!("{}: {}", status, message)));
            }
            return Err(ReportError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        debug!(session = %request.session_id, "Report endpoint accepted request");
        Ok(())
    }
}
