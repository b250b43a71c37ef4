use crate::domain::event::{ActorKind, EventType, NewEvent};
use crate::domain::Event;
use crate::error::Result;

use super::Store;

impl Store {
    /// Writes one row to the append-only audit log. Never fails the caller's
    /// wider operation silently — callers decide whether an event-write
    /// failure should roll back the surrounding transaction.
    pub async fn create_event(&self, event_type: EventType, actor_type: ActorKind, actor_id: i64, new_event: NewEvent) -> Result<Event> {
        let row = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (event_type, appointment_id, client_id, master_id, actor_type, actor_id, payload)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(event_type.as_str())
        .bind(new_event.appointment_id)
        .bind(new_event.client_id)
        .bind(new_event.master_id)
        .bind(actor_type)
        .bind(actor_id)
        .bind(new_event.payload)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn events_for_appointment(&self, appointment_id: i64) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE appointment_id = $1 ORDER BY created_at",
        )
        .bind(appointment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
