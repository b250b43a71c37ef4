use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// The single service provider. Exactly one row exists in the MVP deployment,
/// but every engine function takes a `Master` as explicit input rather than
/// assuming a singleton, so the schema's multi-master shape stays usable.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Master {
    pub id: i64,
    pub display_name: String,
    pub external_user_id: i64,
    pub timezone: String,
    pub work_start_time: NaiveTime,
    pub work_end_time: NaiveTime,
    pub buffer_min: i32,
    pub created_at: DateTime<Utc>,
}

impl Master {
    /// Parses `timezone` into a `chrono_tz::Tz`. The slot engine resolves the
    /// work window's local wall-clock endpoints in this zone exactly once per
    /// query, then operates in UTC for every subsequent comparison.
    pub fn tz(&self) -> crate::error::Result<chrono_tz::Tz> {
        self.timezone
            .parse()
            .map_err(|_| crate::error::Error::InvalidTimezone(self.timezone.clone()))
    }
}
