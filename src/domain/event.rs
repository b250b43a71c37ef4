use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "actor_kind", rename_all = "snake_case")]
pub enum ActorKind {
    Client,
    Master,
    Scheduler,
    Admin,
}

/// Every event the system ever emits. Kept as a closed enum (rather than a
/// free-form string column, as the original Python model used) so emission
/// sites are checked exhaustively by the compiler; `as_str` is what actually
/// lands in the `events.event_type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    AppointmentCreated,
    AppointmentConfirmed,
    AppointmentCancelledByClient,
    AppointmentCancelledByMaster,
    LateCancel,
    ClientArrived,
    ServiceDone,
    ReminderSent24h,
    ReminderSent6h,
    ReminderSent3h,
    ReminderFailed,
    ClientBlockedBot,
    ClientUnsubscribed,
    ClientReactivated,
    PriceChanged,
    BlackoutCreated,
    ServiceUpdated,
    AdminAdded,
    AdminRemoved,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AppointmentCreated => "appointment_created",
            Self::AppointmentConfirmed => "appointment_confirmed",
            Self::AppointmentCancelledByClient => "appointment_cancelled_by_client",
            Self::AppointmentCancelledByMaster => "appointment_cancelled_by_master",
            Self::LateCancel => "late_cancel",
            Self::ClientArrived => "client_arrived",
            Self::ServiceDone => "service_done",
            Self::ReminderSent24h => "reminder_sent_24h",
            Self::ReminderSent6h => "reminder_sent_6h",
            Self::ReminderSent3h => "reminder_sent_3h",
            Self::ReminderFailed => "reminder_failed",
            Self::ClientBlockedBot => "client_blocked_bot",
            Self::ClientUnsubscribed => "client_unsubscribed",
            Self::ClientReactivated => "client_reactivated",
            Self::PriceChanged => "price_changed",
            Self::BlackoutCreated => "blackout_created",
            Self::ServiceUpdated => "service_updated",
            Self::AdminAdded => "admin_added",
            Self::AdminRemoved => "admin_removed",
        }
    }
}

/// Append-only audit record. Never updated or deleted after insert.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub event_type: String,
    pub appointment_id: Option<i64>,
    pub client_id: Option<i64>,
    pub master_id: Option<i64>,
    pub actor_type: ActorKind,
    pub actor_id: i64,
    pub payload: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Construction parameters for a new event row; keeps `create_appointment`
/// and friends from passing eight positional arguments at every call site.
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    pub appointment_id: Option<i64>,
    pub client_id: Option<i64>,
    pub master_id: Option<i64>,
    pub payload: Option<serde_json::Value>,
}

impl NewEvent {
    pub fn for_appointment(appointment_id: i64, client_id: i64, master_id: i64) -> Self {
        Self { appointment_id: Some(appointment_id), client_id: Some(client_id), master_id: Some(master_id), payload: None }
    }

    pub fn for_client(client_id: i64) -> Self {
        Self { client_id: Some(client_id), ..Default::default() }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }
}
