use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An offered service type. Never hard-deleted once referenced by an
/// appointment — toggled `active` instead.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub duration_min: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
