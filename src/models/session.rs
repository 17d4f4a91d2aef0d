use serde::{Deserialize, Serialize};

/// Server-side session stored in redb under the token's storage key
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionRecord {
    pub account_id: u64,
    /// When the session was created (Unix timestamp)
    pub created_at: i64,
    /// Unix timestamp after which the session is rejected
    pub expires_at: i64,
}

impl SessionRecord {
    pub fn new(account_id: u64, now: i64, ttl_secs: i64) -> Self {
        Self {
            account_id,
            created_at: now,
            expires_at: now.saturating_add(ttl_secs),
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }
}
