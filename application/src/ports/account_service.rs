//! Account service port
//!
//! Creates a user account for the email captured at ACCOUNT_CREATION.
//! Failure never blocks the interview.

use async_trait::async_trait;
use interview_domain::EmailAddress;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier of a created account
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors reported by the account service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("An account already exists for {0}")]
    AlreadyExists(String),

    #[error("Account service rejected request: {0}")]
    Rejected(String),

    #[error("Account service unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait AccountService: Send + Sync {
    async fn create_account(&self, email: &EmailAddress) -> Result<AccountId, AccountError>;
}

/// Account service that never creates anything, for offline runs
pub struct NoAccountService;

#[async_trait]
impl AccountService for NoAccountService {
    async fn create_account(&self, email: &EmailAddress) -> Result<AccountId, AccountError> {
        Err(AccountError::Unavailable(format!(
            "account creation disabled, not registering {}",
            email
        )))
    }
}
