use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::event::{ActorKind, EventType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "appointment_status", rename_all = "snake_case")]
pub enum AppointmentStatus {
    Booked,
    Confirmed,
    Arrived,
    Done,
    Cancelled,
    LateCancel,
}

impl AppointmentStatus {
    /// Active means considered for slot-overlap purposes.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Booked | Self::Confirmed | Self::Arrived)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled | Self::LateCancel)
    }
}

/// The central entity. `price_snapshot` is frozen at creation and never
/// mutated by later price edits.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub master_id: i64,
    pub client_id: i64,
    pub service_id: i64,
    pub start_ts: DateTime<Utc>,
    pub end_ts: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub price_snapshot: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

/// The threshold below which a cancel becomes a `late_cancel` instead of a
/// plain `cancelled`.
pub const LATE_CANCEL_WINDOW: Duration = Duration::hours(1);

/// Outcome of a lifecycle transition attempt, reported back to the caller so
/// idempotent re-triggers (e.g. a second cancel) can be distinguished from a
/// transition that actually happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied,
    NoOpAlreadyInState,
}

/// Pure decision of what a `confirm` call against `apt` should do, given
/// `now`. Confirm from a non-`Booked` state is a no-op (including a repeat
/// confirm of an already-confirmed appointment).
pub fn decide_confirm(apt: &Appointment) -> TransitionOutcome {
    if apt.status == AppointmentStatus::Booked {
        TransitionOutcome::Applied
    } else {
        TransitionOutcome::NoOpAlreadyInState
    }
}

/// Pure decision of what a `mark_arrived` call should do. Valid from
/// `Booked` or `Confirmed`.
pub fn decide_arrive(apt: &Appointment) -> TransitionOutcome {
    if matches!(apt.status, AppointmentStatus::Booked | AppointmentStatus::Confirmed) {
        TransitionOutcome::Applied
    } else {
        TransitionOutcome::NoOpAlreadyInState
    }
}

/// Pure decision of what a `mark_done` call should do. Valid from `Arrived`.
pub fn decide_done(apt: &Appointment) -> TransitionOutcome {
    if apt.status == AppointmentStatus::Arrived {
        TransitionOutcome::Applied
    } else {
        TransitionOutcome::NoOpAlreadyInState
    }
}

/// Result of a cancel decision: which terminal status to move to (if any)
/// and which event to emit. `now` is evaluated at call time, not at any
/// earlier UI interaction, per the late-cancel policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelDecision {
    pub outcome: TransitionOutcome,
    pub new_status: AppointmentStatus,
    pub event_type: EventType,
}

pub fn decide_cancel(apt: &Appointment, actor: ActorKind, now: DateTime<Utc>) -> CancelDecision {
    if !matches!(apt.status, AppointmentStatus::Booked | AppointmentStatus::Confirmed) {
        return CancelDecision {
            outcome: TransitionOutcome::NoOpAlreadyInState,
            new_status: apt.status,
            event_type: EventType::LateCancel, // unused when NoOp
        };
    }

    let is_late = apt.start_ts - now < LATE_CANCEL_WINDOW;
    let new_status = if is_late { AppointmentStatus::LateCancel } else { AppointmentStatus::Cancelled };
    let event_type = if is_late {
        EventType::LateCancel
    } else {
        match actor {
            ActorKind::Client => EventType::AppointmentCancelledByClient,
            ActorKind::Master => EventType::AppointmentCancelledByMaster,
            ActorKind::Scheduler | ActorKind::Admin => EventType::AppointmentCancelledByMaster,
        }
    };

    CancelDecision { outcome: TransitionOutcome::Applied, new_status, event_type }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn booked_at(start_ts: DateTime<Utc>) -> Appointment {
        Appointment {
            id: 1,
            master_id: 1,
            client_id: 1,
            service_id: 1,
            start_ts,
            end_ts: start_ts + Duration::minutes(30),
            status: AppointmentStatus::Booked,
            confirmed_at: None,
            price_snapshot: Decimal::new(150000, 2),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            cancelled_at: None,
        }
    }

    #[test]
    fn cancel_within_the_hour_is_late_cancel() {
        let now = Utc::now();
        let apt = booked_at(now + Duration::minutes(30));
        let decision = decide_cancel(&apt, ActorKind::Client, now);
        assert_eq!(decision.outcome, TransitionOutcome::Applied);
        assert_eq!(decision.new_status, AppointmentStatus::LateCancel);
        assert_eq!(decision.event_type, EventType::LateCancel);
    }

    #[test]
    fn cancel_well_ahead_is_plain_cancel() {
        let now = Utc::now();
        let apt = booked_at(now + Duration::hours(25));
        let decision = decide_cancel(&apt, ActorKind::Client, now);
        assert_eq!(decision.new_status, AppointmentStatus::Cancelled);
        assert_eq!(decision.event_type, EventType::AppointmentCancelledByClient);
    }

    #[test]
    fn cancel_at_exactly_one_hour_is_not_late() {
        let now = Utc::now();
        let apt = booked_at(now + Duration::hours(1));
        let decision = decide_cancel(&apt, ActorKind::Client, now);
        assert_eq!(decision.new_status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn second_cancel_of_an_already_cancelled_appointment_is_a_no_op() {
        let now = Utc::now();
        let mut apt = booked_at(now + Duration::hours(25));
        apt.status = AppointmentStatus::Cancelled;
        let decision = decide_cancel(&apt, ActorKind::Client, now);
        assert_eq!(decision.outcome, TransitionOutcome::NoOpAlreadyInState);
    }

    #[test]
    fn confirm_from_booked_applies_once_then_no_ops() {
        let apt = booked_at(Utc::now() + Duration::hours(10));
        assert_eq!(decide_confirm(&apt), TransitionOutcome::Applied);

        let mut confirmed = apt;
        confirmed.status = AppointmentStatus::Confirmed;
        assert_eq!(decide_confirm(&confirmed), TransitionOutcome::NoOpAlreadyInState);
    }

    #[test]
    fn arrive_valid_from_booked_or_confirmed_only() {
        let mut apt = booked_at(Utc::now());
        assert_eq!(decide_arrive(&apt), TransitionOutcome::Applied);
        apt.status = AppointmentStatus::Confirmed;
        assert_eq!(decide_arrive(&apt), TransitionOutcome::Applied);
        apt.status = AppointmentStatus::Done;
        assert_eq!(decide_arrive(&apt), TransitionOutcome::NoOpAlreadyInState);
    }

    #[test]
    fn done_valid_only_from_arrived() {
        let mut apt = booked_at(Utc::now());
        assert_eq!(decide_done(&apt), TransitionOutcome::NoOpAlreadyInState);
        apt.status = AppointmentStatus::Arrived;
        assert_eq!(decide_done(&apt), TransitionOutcome::Applied);
    }
}
