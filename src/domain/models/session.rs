use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Server-side session record. `user_id` is `None` for anonymous sessions
/// that only remember where to send the browser after login.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Session {
    pub token_hash: String,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub role: Option<String>,
    pub return_to: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}
