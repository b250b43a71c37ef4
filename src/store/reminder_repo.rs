use chrono::{DateTime, Utc};

use crate::domain::reminder::{PlannedReminder, ReminderKind};
use crate::domain::Reminder;
use crate::error::Result;

use super::Store;

/// A due reminder joined to the fields the dispatcher needs to compose and
/// address the outbound message without a second round-trip per row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DueReminder {
    pub id: i64,
    pub appointment_id: i64,
    pub kind: ReminderKind,
    pub chat_id: i64,
    pub client_external_user_id: i64,
    pub start_ts: DateTime<Utc>,
    pub service_name: String,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl Store {
    pub async fn insert_planned_reminders(&self, appointment_id: i64, planned: &[PlannedReminder]) -> Result<()> {
        for p in planned {
            sqlx::query(
                "INSERT INTO reminders (appointment_id, remind_at_ts, kind, status) VALUES ($1, $2, $3, 'pending')",
            )
            .bind(appointment_id)
            .bind(p.remind_at)
            .bind(p.kind)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    /// Reminders due for dispatch as of `now`, joined to their still-active
    /// parent appointment. Cancelled/terminal appointments never surface
    /// here because their reminders are cancelled alongside the transition.
    pub async fn due_reminders(&self, now: DateTime<Utc>) -> Result<Vec<DueReminder>> {
        let rows = sqlx::query_as::<_, DueReminder>(
            r#"
            SELECT
                r.id AS id,
                r.appointment_id AS appointment_id,
                r.kind AS kind,
                c.chat_id AS chat_id,
                c.external_user_id AS client_external_user_id,
                a.start_ts AS start_ts,
                s.name AS service_name,
                a.confirmed_at AS confirmed_at
            FROM reminders r
            JOIN appointments a ON a.id = r.appointment_id
            JOIN clients c ON c.id = a.client_id
            JOIN services s ON s.id = a.service_id
            WHERE r.status = 'pending' AND r.remind_at_ts <= $1
              AND a.status IN ('booked', 'confirmed', 'arrived')
            ORDER BY r.remind_at_ts
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn mark_reminder_sent(&self, id: i64, sent_at: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE reminders SET status = 'sent', sent_at = $2 WHERE id = $1")
            .bind(id)
            .bind(sent_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn mark_reminder_failed(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE reminders SET status = 'failed' WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Cancels a single reminder without sending it — used when a confirm-type
    /// reminder fires after the appointment was already confirmed by another
    /// channel (e.g. an earlier reminder's confirm button).
    pub async fn mark_reminder_cancelled(&self, id: i64) -> Result<()> {
        sqlx::query("UPDATE reminders SET status = 'cancelled' WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn cancel_pending_reminders(&self, appointment_id: i64) -> Result<()> {
        sqlx::query("UPDATE reminders SET status = 'cancelled' WHERE appointment_id = $1 AND status = 'pending'")
            .bind(appointment_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[allow(dead_code)]
    pub async fn reminder_by_id(&self, id: i64) -> Result<Option<Reminder>> {
        let row = sqlx::query_as::<_, Reminder>("SELECT * FROM reminders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
