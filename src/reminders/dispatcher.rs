use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::reminder::ReminderKind;
use crate::store::Store;
use crate::transport::{ChatTransport, OutboundMessage};

/// Ticks every 60s and runs one dispatch pass. A `tokio::sync::Mutex`
/// run-guard gives "at most one instance in flight" semantics — a tick that
/// fires while the previous pass is still running is skipped and logged,
/// rather than queued, matching the scheduler's `max_instances=1` intent
/// from `original_source`.
pub async fn run_dispatcher(store: Store, transport: Arc<dyn ChatTransport>) {
    let guard = Arc::new(Mutex::new(()));
    let mut ticker = tokio::time::interval(StdDuration::from_secs(60));

    loop {
        ticker.tick().await;
        let guard = guard.clone();
        let Ok(_permit) = guard.try_lock() else {
            log::warn!("reminder dispatcher tick skipped: previous run still in flight");
            continue;
        };

        if let Err(e) = dispatch_once(&store, transport.as_ref()).await {
            log::error!("reminder dispatcher pass failed: {e}");
        }
    }
}

async fn dispatch_once(store: &Store, transport: &dyn ChatTransport) -> crate::error::Result<()> {
    let now = Utc::now();
    let due = store.due_reminders(now).await?;
    if due.is_empty() {
        return Ok(());
    }
    log::info!("dispatching {} due reminder(s)", due.len());

    for reminder in due {
        if reminder.kind == ReminderKind::Confirm6h && reminder.confirmed_at.is_some() {
            store.mark_reminder_cancelled(reminder.id).await?;
            continue;
        }

        let text = message_for(reminder.kind, &reminder.service_name, reminder.start_ts);
        let outcome = transport
            .send_message(OutboundMessage::plain(reminder.client_external_user_id, text))
            .await;

        match outcome {
            Ok(()) => {
                store.mark_reminder_sent(reminder.id, Utc::now()).await?;
                store
                    .create_event(
                        reminder.kind.sent_event(),
                        crate::domain::ActorKind::Scheduler,
                        reminder.appointment_id,
                        crate::domain::event::NewEvent { appointment_id: Some(reminder.appointment_id), ..Default::default() },
                    )
                    .await?;
            }
            Err(crate::error::Error::TransportUserBlocked) => {
                store.mark_reminder_failed(reminder.id).await?;
                store
                    .create_event(
                        crate::domain::EventType::ReminderFailed,
                        crate::domain::ActorKind::Scheduler,
                        reminder.appointment_id,
                        crate::domain::event::NewEvent { appointment_id: Some(reminder.appointment_id), ..Default::default() },
                    )
                    .await?;
                if let Some(client) = store.client_by_external_user_id(reminder.client_external_user_id).await? {
                    store.set_client_status(client.id, crate::domain::ClientStatus::Blocked).await?;
                    store
                        .create_event(
                            crate::domain::EventType::ClientBlockedBot,
                            crate::domain::ActorKind::Scheduler,
                            client.id,
                            crate::domain::event::NewEvent::for_client(client.id),
                        )
                        .await?;
                }
            }
            Err(e) => {
                log::warn!("reminder {} delivery failed: {e}", reminder.id);
                store.mark_reminder_failed(reminder.id).await?;
                store
                    .create_event(
                        crate::domain::EventType::ReminderFailed,
                        crate::domain::ActorKind::Scheduler,
                        reminder.appointment_id,
                        crate::domain::event::NewEvent { appointment_id: Some(reminder.appointment_id), ..Default::default() },
                    )
                    .await?;
            }
        }
    }
    Ok(())
}

fn message_for(kind: ReminderKind, service_name: &str, start_ts: chrono::DateTime<Utc>) -> String {
    let when = start_ts.format("%Y-%m-%d %H:%M UTC");
    match kind {
        ReminderKind::Confirm24h => format!("Reminder: {service_name} is booked for {when}. Please confirm your visit."),
        ReminderKind::Confirm6h => format!("Your {service_name} appointment is in a few hours ({when}). Please confirm."),
        ReminderKind::Remind3h => format!("See you soon: {service_name} at {when}."),
    }
}
