//! Orchestrates the pure lifecycle decisions in `domain::appointment` against
//! `Store`, emitting the matching audit event and reminder-plan side effects
//! in the same call. Nothing here talks to the chat transport — callers
//! (chat handlers, admin routes, the dispatcher) decide what to say and to
//! whom once the engine call returns.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::domain::appointment::{decide_arrive, decide_cancel, decide_confirm, decide_done, TransitionOutcome};
use crate::domain::event::{ActorKind, EventType, NewEvent};
use crate::domain::reminder::plan_reminders;
use crate::domain::{Appointment, Master};
use crate::error::{Error, Result};
use crate::slots::{available_slots, work_window, BusyWindow};
use crate::store::Store;

/// Dates within the booking horizon that have at least one admissible slot
/// for `service_id`. Unlike `available_slots_for`, this needs to query each
/// candidate day; since `DayWindowSource` is synchronous, the per-day store
/// reads happen up front and are handed to the pure walk as plain data.
pub async fn available_dates_for(
    store: &Store,
    master: &Master,
    service_id: i64,
    today: NaiveDate,
    horizon_days: i64,
    now: DateTime<Utc>,
    min_booking_ahead_hours: i64,
) -> Result<Vec<NaiveDate>> {
    let service = store.service_by_id(service_id).await?.ok_or(Error::NotFound)?;

    let mut out = Vec::new();
    for offset in 0..horizon_days {
        let day = today + chrono::Duration::days(offset);
        let busy = store.active_windows_on(master.id, day, master).await?;
        let blackouts = store.blackout_windows_on(master.id, day, master).await?;
        let slots = available_slots(master, service.duration_min, day, now, min_booking_ahead_hours, &busy, &blackouts)?;
        if !slots.is_empty() {
            out.push(day);
        }
    }
    Ok(out)
}

/// Computes admissible start instants for `service_id` on `for_date`, using
/// the service's own `duration_min` (authoritative over any config default).
pub async fn available_slots_for(store: &Store, master: &Master, service_id: i64, for_date: NaiveDate, now: DateTime<Utc>, min_booking_ahead_hours: i64) -> Result<Vec<DateTime<Utc>>> {
    let service = store.service_by_id(service_id).await?.ok_or(Error::NotFound)?;
    let busy = store.active_windows_on(master.id, for_date, master).await?;
    let blackouts = store.blackout_windows_on(master.id, for_date, master).await?;
    available_slots(master, service.duration_min, for_date, now, min_booking_ahead_hours, &busy, &blackouts)
}

/// Creates a booked appointment, plans its reminders, and writes the
/// creation event — all after the store's own transactional conflict check
/// has confirmed the slot is free. A price snapshot is resolved as of the
/// appointment's date; `Error::PriceUnavailable` aborts before touching the
/// appointments table.
pub async fn book(
    store: &Store,
    master: &Master,
    client_id: i64,
    service_id: i64,
    start_ts: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Appointment> {
    let service = store.service_by_id(service_id).await?.ok_or(Error::NotFound)?;
    let end_ts = start_ts + chrono::Duration::minutes(service.duration_min as i64);

    let price = store
        .current_price(master.id, service_id, start_ts.date_naive())
        .await?
        .ok_or(Error::PriceUnavailable)?;

    let appointment = store
        .create_appointment_tx(master.id, client_id, service_id, start_ts, end_ts, price.price)
        .await?;

    let planned = plan_reminders(start_ts, now);
    store.insert_planned_reminders(appointment.id, &planned).await?;

    store
        .create_event(
            EventType::AppointmentCreated,
            ActorKind::Client,
            client_id,
            NewEvent::for_appointment(appointment.id, client_id, master.id),
        )
        .await?;

    Ok(appointment)
}

pub async fn confirm(store: &Store, appointment_id: i64, now: DateTime<Utc>) -> Result<Appointment> {
    let apt = store.appointment_by_id(appointment_id).await?.ok_or(Error::NotFound)?;
    match decide_confirm(&apt) {
        TransitionOutcome::NoOpAlreadyInState => Ok(apt),
        TransitionOutcome::Applied => {
            let updated = store.set_confirmed(appointment_id, now).await?;
            store
                .create_event(
                    EventType::AppointmentConfirmed,
                    ActorKind::Client,
                    apt.client_id,
                    NewEvent::for_appointment(appointment_id, apt.client_id, apt.master_id),
                )
                .await?;
            Ok(updated)
        }
    }
}

pub async fn mark_arrived(store: &Store, appointment_id: i64, actor: ActorKind, actor_id: i64) -> Result<Appointment> {
    let apt = store.appointment_by_id(appointment_id).await?.ok_or(Error::NotFound)?;
    match decide_arrive(&apt) {
        TransitionOutcome::NoOpAlreadyInState => Ok(apt),
        TransitionOutcome::Applied => {
            let updated = store.set_status(appointment_id, crate::domain::AppointmentStatus::Arrived).await?;
            store
                .create_event(EventType::ClientArrived, actor, actor_id, NewEvent::for_appointment(appointment_id, apt.client_id, apt.master_id))
                .await?;
            Ok(updated)
        }
    }
}

pub async fn mark_done(store: &Store, appointment_id: i64, actor: ActorKind, actor_id: i64, now: DateTime<Utc>) -> Result<Appointment> {
    let apt = store.appointment_by_id(appointment_id).await?.ok_or(Error::NotFound)?;
    match decide_done(&apt) {
        TransitionOutcome::NoOpAlreadyInState => Ok(apt),
        TransitionOutcome::Applied => {
            let updated = store.set_status(appointment_id, crate::domain::AppointmentStatus::Done).await?;
            store.set_client_last_visit(apt.client_id, now).await?;
            store
                .create_event(EventType::ServiceDone, actor, actor_id, NewEvent::for_appointment(appointment_id, apt.client_id, apt.master_id))
                .await?;
            Ok(updated)
        }
    }
}

/// Cancels an appointment, applying the late-cancel boundary at `now`, and
/// cancels any still-pending reminders so the dispatcher never fires one
/// against a dead appointment.
pub async fn cancel(store: &Store, appointment_id: i64, actor: ActorKind, actor_id: i64, now: DateTime<Utc>) -> Result<Appointment> {
    let apt = store.appointment_by_id(appointment_id).await?.ok_or(Error::NotFound)?;
    let decision = decide_cancel(&apt, actor, now);
    match decision.outcome {
        TransitionOutcome::NoOpAlreadyInState => Ok(apt),
        TransitionOutcome::Applied => {
            let updated = store.set_cancelled(appointment_id, decision.new_status, now).await?;
            store.cancel_pending_reminders(appointment_id).await?;
            store
                .create_event(decision.event_type, actor, actor_id, NewEvent::for_appointment(appointment_id, apt.client_id, apt.master_id))
                .await?;
            Ok(updated)
        }
    }
}

/// Sanity check used by the admin blackout handler: a new blackout window
/// that intersects an existing active appointment is rejected up front
/// rather than silently leaving the appointment orphaned in a blacked-out
/// slot.
pub async fn blackout_conflicts(store: &Store, master: &Master, start_ts: DateTime<Utc>, end_ts: DateTime<Utc>) -> Result<bool> {
    let mut day = start_ts.date_naive();
    let last_day = end_ts.date_naive();
    loop {
        let (work_start, work_end) = match work_window(master, day) {
            Ok(w) => w,
            Err(_) => {
                day += chrono::Duration::days(1);
                if day > last_day {
                    break;
                }
                continue;
            }
        };
        let busy = store.active_windows_on(master.id, day, master).await?;
        let window = BusyWindow { start: start_ts.max(work_start), end: end_ts.min(work_end) };
        if busy.iter().any(|b| window.start < b.end && window.end > b.start) {
            return Ok(true);
        }
        if day >= last_day {
            break;
        }
        day += chrono::Duration::days(1);
    }
    Ok(false)
}
