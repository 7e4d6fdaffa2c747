//! Account creation over a hosted auth admin API

use async_trait::async_trait;
use interview_application::ports::account_service::{AccountError, AccountId, AccountService};
use interview_domain::EmailAddress;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Creates unconfirmed users through `POST {auth_url}/admin/users`
pub struct AuthAccountService {
    client: Client,
    auth_url: String,
    api_key: String,
}

impl AuthAccountService {
    pub fn new(auth_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            auth_url: auth_url.into(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/admin/users", self.auth_url.trim_end_matches('/'))
    }

    fn request_body(email: &EmailAddress) -> Value {
        // the visitor confirms through the link in the report email
        json!({ "email": email.as_str(), "email_confirm": false })
    }

    fn parse_id(raw: &Value) -> Result<AccountId, AccountError> {
        raw["id"]
            .as_str()
            .or_else(|| raw["user"]["id"].as_str())
            .map(|id| AccountId(id.to_string()))
            .ok_or_else(|| AccountError::Rejected("response carried no user id".to_string()))
    }
}

#[async_trait]
impl AccountService for AuthAccountService {
    async fn create_account(&self, email: &EmailAddress) -> Result<AccountId, AccountError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&Self::request_body(email))
            .send()
            .await
            .map_err(|e| AccountError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY
                    if body.contains("already") =>
                {
                    AccountError::AlreadyExists(email.to_string())
                }
                s if s.is_server_error() => {
                    AccountError::Unavailable(format!("{}: {}", s, body))
                }
                s => AccountError::Rejected(format!("{}: {}", s, body)),
            });
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| AccountError::Rejected(e.to_string()))?;
        Self::parse_id(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_leaves_email_unconfirmed() {
        let email = EmailAddress::parse("jo@acme.io").unwrap();
        assert_eq!(
            AuthAccountService::request_body(&email),
            json!({ "email": "jo@acme.io", "email_confirm": false })
        );
    }

    #[test]
    fn test_parse_id_accepts_flat_and_nested_shapes() {
        assert_eq!(
            AuthAccountService::parse_id(&json!({ "id": "u-1" })).unwrap(),
            AccountId("u-1".to_string())
        );
        assert_eq!(
            AuthAccountService::parse_id(&json!({ "user": { "id": "u-2" } })).unwrap(),
            AccountId("u-2".to_string())
        );
        assert!(AuthAccountService::parse_id(&json!({})).is_err());
    }

    #[test]
    fn test_endpoint() {
        let service = AuthAccountService::new("https://auth.example.com/auth/v1/", "k");
        assert_eq!(service.endpoint(), "https://auth.example.com/auth/v1/admin/users");
    }
}
