use serde::{Deserialize, Serialize};

use crate::constants::MAX_EMAIL_LENGTH;

/// Account record stored in redb
///
/// The password hash never leaves the store; clients only see [`AccountSummary`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Normalized email address
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    /// When the account was created (Unix timestamp)
    pub created_at: i64,
}

/// Account model for API responses
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountSummary {
    pub id: u64,
    pub email: String,
}

impl AccountRecord {
    pub fn summary(&self, id: u64) -> AccountSummary {
        AccountSummary {
            id,
            email: self.email.clone(),
        }
    }
}

/// Normalize an email address for storage: trim and lowercase the domain
pub fn normalize_email(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.rsplit_once('@') {
        Some((local, domain)) => format!("{}@{}", local, domain.to_ascii_lowercase()),
        None => trimmed.to_string(),
    }
}

/// Key of the unique email index; uniqueness is case-insensitive
pub fn email_index_key(email: &str) -> String {
    email.to_lowercase()
}

/// Validate the structure of a (normalized) email address
pub fn validate_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return false;
    }
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        })
}
