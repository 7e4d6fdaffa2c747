//! Email address value object
//!
//! Syntactic validation only. Deliverability is the account service's
//! problem.

use serde::{Deserialize, Serialize};

const LOCAL_SPECIALS: &str = ".!#$%&'*+/=?^_`{|}~-";

/// A syntactically valid email address (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse a single address. Surrounding whitespace is ignored and the
    /// domain is lowercased.
    pub fn parse(raw: &str) -> Option<Self> {
        let candidate = raw.trim();
        if candidate.len() > 254 {
            return None;
        }
        let (local, domain) = candidate.split_once('@')?;
        if !is_valid_local(local) || !is_valid_domain(domain) {
            return None;
        }
        Some(Self(format!("{}@{}", local, domain.to_lowercase())))
    }

    /// Find the first valid address inside a free-text reply such as
    /// `"sure, it's jo@acme.io."`.
    pub fn find_in(text: &str) -> Option<Self> {
        text.split_whitespace()
            .map(|token| {
                token.trim_matches(|c: char| {
                    matches!(c, '<' | '>' | '(' | ')' | '[' | ']' | ',' | ';' | ':' | '"' | '\'' | '.' | '!' | '?')
                })
            })
            .find_map(Self::parse)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map(|(_, d)| d).unwrap_or_default()
    }
}

fn is_valid_local(local: &str) -> bool {
    !local.is_empty()
        && local.len() <= 64
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || LOCAL_SPECIALS.contains(c))
}

fn is_valid_domain(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    let tld = labels.last().copied().unwrap_or_default();
    labels_ok && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid email address: {}", value))
    }
}

impl From<EmailAddress> for String {
    fn from(email: EmailAddress) -> Self {
        email.0
    }
}
