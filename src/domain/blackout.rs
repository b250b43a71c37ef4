use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A master-owned closed interval during which no bookings may be created.
/// Immutable once created; does not retroactively cancel existing bookings.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Blackout {
    pub id: i64,
    pub master_id: i64,
    pub start_ts: DateTime<Utc>,
    pub end_ts: DateTime<Utc>,
    pub reason: Option<String>,
    pub created_by_admin_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}
