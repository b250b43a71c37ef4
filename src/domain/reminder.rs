use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "reminder_type", rename_all = "snake_case")]
pub enum ReminderKind {
    Confirm24h,
    Confirm6h,
    Remind3h,
}

impl ReminderKind {
    pub fn offset(self) -> Duration {
        match self {
            Self::Confirm24h => Duration::hours(24),
            Self::Confirm6h => Duration::hours(6),
            Self::Remind3h => Duration::hours(3),
        }
    }

    pub const ALL: [ReminderKind; 3] = [Self::Confirm24h, Self::Confirm6h, Self::Remind3h];

    /// The audit event logged when a reminder of this kind is actually sent.
    pub fn sent_event(self) -> crate::domain::event::EventType {
        use crate::domain::event::EventType;
        match self {
            Self::Confirm24h => EventType::ReminderSent24h,
            Self::Confirm6h => EventType::ReminderSent6h,
            Self::Remind3h => EventType::ReminderSent3h,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "reminder_status", rename_all = "snake_case")]
pub enum ReminderStatus {
    Pending,
    Sent,
    Cancelled,
    Failed,
}

/// One planned or delivered notification for a parent appointment.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub appointment_id: i64,
    pub remind_at_ts: DateTime<Utc>,
    pub kind: ReminderKind,
    pub status: ReminderStatus,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One (kind, fire_at) pair to materialize as a pending reminder row.
#[derive(Debug, Clone, Copy)]
pub struct PlannedReminder {
    pub kind: ReminderKind,
    pub remind_at: DateTime<Utc>,
}

/// Derives the reminder plan for an appointment starting at `start_ts`,
/// relative to `now`. Only offsets whose fire time is strictly after `now`
/// are planned — a reminder is never retroactively created in the past.
pub fn plan_reminders(start_ts: DateTime<Utc>, now: DateTime<Utc>) -> Vec<PlannedReminder> {
    ReminderKind::ALL
        .iter()
        .filter_map(|&kind| {
            let remind_at = start_ts - kind.offset();
            (remind_at > now).then_some(PlannedReminder { kind, remind_at })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appointment_25h_out_plans_all_three_reminders() {
        let now = Utc::now();
        let start_ts = now + Duration::hours(25);
        let planned = plan_reminders(start_ts, now);
        assert_eq!(planned.len(), 3);
        assert!(planned.iter().any(|p| p.kind == ReminderKind::Confirm24h));
        assert!(planned.iter().any(|p| p.kind == ReminderKind::Confirm6h));
        assert!(planned.iter().any(|p| p.kind == ReminderKind::Remind3h));
    }

    #[test]
    fn appointment_2h_out_plans_no_reminders_in_the_past() {
        let now = Utc::now();
        let start_ts = now + Duration::hours(2);
        let planned = plan_reminders(start_ts, now);
        assert!(planned.is_empty());
    }

    #[test]
    fn appointment_4h_out_plans_only_the_3h_reminder() {
        let now = Utc::now();
        let start_ts = now + Duration::hours(4);
        let planned = plan_reminders(start_ts, now);
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].kind, ReminderKind::Remind3h);
    }
}
