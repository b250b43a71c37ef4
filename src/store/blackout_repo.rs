use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::Blackout;
use crate::error::Result;
use crate::slots::BusyWindow;

use super::Store;

impl Store {
    pub async fn blackouts_overlapping(&self, master_id: i64, window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> Result<Vec<Blackout>> {
        let rows = sqlx::query_as::<_, Blackout>(
            "SELECT * FROM blackouts WHERE master_id = $1 AND start_ts < $3 AND end_ts > $2",
        )
        .bind(master_id)
        .bind(window_start)
        .bind(window_end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn blackout_windows_on(&self, master_id: i64, date: NaiveDate, master: &crate::domain::Master) -> Result<Vec<BusyWindow>> {
        let (start, end) = crate::slots::work_window(master, date)?;
        let blackouts = self.blackouts_overlapping(master_id, start, end).await?;
        Ok(blackouts.into_iter().map(|b| BusyWindow { start: b.start_ts, end: b.end_ts }).collect())
    }

    pub async fn create_blackout(
        &self,
        master_id: i64,
        start_ts: DateTime<Utc>,
        end_ts: DateTime<Utc>,
        reason: Option<String>,
        created_by_admin_id: Option<i64>,
    ) -> Result<Blackout> {
        let row = sqlx::query_as::<_, Blackout>(
            r#"
            INSERT INTO blackouts (master_id, start_ts, end_ts, reason, created_by_admin_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(master_id)
        .bind(start_ts)
        .bind(end_ts)
        .bind(reason)
        .bind(created_by_admin_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
