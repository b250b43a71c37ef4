use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::domain::appointment::AppointmentStatus;
use crate::domain::Appointment;
use crate::error::Result;
use crate::slots::BusyWindow;

use super::Store;

/// Statuses considered "active" for overlap / schedule purposes, as a SQL
/// literal list — kept alongside `AppointmentStatus::is_active` so both the
/// in-database filter and the in-process decision use the same set.
const ACTIVE_STATUSES: &str = "('booked', 'confirmed', 'arrived')";

impl Store {
    pub async fn appointment_by_id(&self, id: i64) -> Result<Option<Appointment>> {
        let apt = sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(apt)
    }

    pub async fn active_windows_on(&self, master_id: i64, date: NaiveDate, master: &crate::domain::Master) -> Result<Vec<BusyWindow>> {
        let (start, end) = crate::slots::work_window(master, date)?;
        let rows = sqlx::query_as::<_, (DateTime<Utc>, DateTime<Utc>)>(&format!(
            "SELECT start_ts, end_ts FROM appointments WHERE master_id = $1 AND status IN {ACTIVE_STATUSES} AND start_ts >= $2 AND start_ts < $3"
        ))
        .bind(master_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(start, end)| BusyWindow { start, end }).collect())
    }

    pub async fn upcoming_for_client(&self, client_id: i64, now: DateTime<Utc>) -> Result<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT * FROM appointments WHERE client_id = $1 AND status IN {ACTIVE_STATUSES} AND start_ts > $2 ORDER BY start_ts"
        ))
        .bind(client_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn for_master_in_range(&self, master_id: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT * FROM appointments
            WHERE master_id = $1 AND start_ts >= $2 AND start_ts < $3
              AND status IN ('booked', 'confirmed', 'arrived', 'done')
            ORDER BY start_ts
            "#,
        )
        .bind(master_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn unconfirmed_upcoming(&self, master_id: i64, now: DateTime<Utc>, until: DateTime<Utc>) -> Result<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT * FROM appointments
            WHERE master_id = $1 AND status = 'booked' AND confirmed_at IS NULL
              AND start_ts > $2 AND start_ts < $3
            ORDER BY start_ts
            "#,
        )
        .bind(master_id)
        .bind(now)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Atomic creation. Runs the pessimistic intersecting-row probe inside
    /// the transaction (layer 1), then inserts; a commit-time constraint
    /// violation from the `EXCLUDE USING GIST` backstop (layer 2) is
    /// translated to `Error::SlotAlreadyTaken` by the caller via
    /// `Error::from_booking_commit`.
    pub async fn create_appointment_tx(
        &self,
        master_id: i64,
        client_id: i64,
        service_id: i64,
        start_ts: DateTime<Utc>,
        end_ts: DateTime<Utc>,
        price_snapshot: Decimal,
    ) -> Result<Appointment> {
        let mut tx = self.pool.begin().await?;

        let conflict: Option<i64> = sqlx::query_scalar(&format!(
            r#"
            SELECT id FROM appointments
            WHERE master_id = $1 AND status IN {ACTIVE_STATUSES}
              AND start_ts < $3 AND end_ts > $2
            FOR UPDATE
            "#
        ))
        .bind(master_id)
        .bind(start_ts)
        .bind(end_ts)
        .fetch_optional(&mut *tx)
        .await?;

        if conflict.is_some() {
            tx.rollback().await?;
            return Err(crate::error::Error::SlotAlreadyTaken);
        }

        let insert_result = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (master_id, client_id, service_id, start_ts, end_ts, status, price_snapshot)
            VALUES ($1, $2, $3, $4, $5, 'booked', $6)
            RETURNING *
            "#,
        )
        .bind(master_id)
        .bind(client_id)
        .bind(service_id)
        .bind(start_ts)
        .bind(end_ts)
        .bind(price_snapshot)
        .fetch_one(&mut *tx)
        .await;

        let appointment = match insert_result {
            Ok(apt) => apt,
            Err(e) => {
                tx.rollback().await?;
                return Err(crate::error::Error::from_booking_commit(e));
            }
        };

        tx.commit().await?;
        Ok(appointment)
    }

    pub async fn set_status(&self, id: i64, status: AppointmentStatus) -> Result<Appointment> {
        let apt = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(apt)
    }

    pub async fn set_confirmed(&self, id: i64, confirmed_at: DateTime<Utc>) -> Result<Appointment> {
        let apt = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = 'confirmed', confirmed_at = $2, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(confirmed_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(apt)
    }

    pub async fn set_cancelled(&self, id: i64, status: AppointmentStatus, cancelled_at: DateTime<Utc>) -> Result<Appointment> {
        let apt = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = $2, cancelled_at = $3, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(cancelled_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(apt)
    }
}
