use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "client_status", rename_all = "lowercase")]
pub enum ClientStatus {
    Active,
    Sleeping,
    Blocked,
    Unsubscribed,
}

/// An end user reachable over the chat transport.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub external_user_id: i64,
    pub chat_id: i64,
    pub status: ClientStatus,
    pub status_updated_at: Option<DateTime<Utc>>,
    pub last_visit_at: Option<DateTime<Utc>>,
    pub last_reactivation_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// True if first contact from this client should be treated as a
    /// reactivation (any non-active status returning to active).
    pub fn needs_reactivation_event(&self) -> bool {
        self.status != ClientStatus::Active
    }
}
