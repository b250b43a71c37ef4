//! Weekly dormant-client sweep: every Monday 10:00 in the master's local
//! zone, clients who have gone quiet get one reactivation message and a
//! status flip to `sleeping`.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Datelike, NaiveTime, TimeZone, Utc, Weekday};

use crate::store::Store;
use crate::transport::{ChatTransport, OutboundMessage};

pub async fn run_sweeper(store: Store, transport: Arc<dyn ChatTransport>, sleeping_threshold_days: i64, reactivation_cooldown_days: i64) {
    loop {
        let sleep_for = match next_monday_ten_am(&store).await {
            Ok(d) => d,
            Err(e) => {
                log::error!("sweeper could not resolve master timezone, retrying in 1h: {e}");
                StdDuration::from_secs(3600)
            }
        };
        tokio::time::sleep(sleep_for).await;

        if let Err(e) = sweep_once(&store, transport.as_ref(), sleeping_threshold_days, reactivation_cooldown_days).await {
            log::error!("dormant-client sweep failed: {e}");
        }
    }
}

async fn next_monday_ten_am(store: &Store) -> crate::error::Result<StdDuration> {
    let master = store.first_master().await?.ok_or(crate::error::Error::NotFound)?;
    let tz = master.tz()?;
    let now_local = Utc::now().with_timezone(&tz);

    let days_until_monday = (7 - now_local.weekday().num_days_from_monday()) % 7;
    let mut candidate_date = now_local.date_naive() + chrono::Duration::days(days_until_monday as i64);
    let ten_am = NaiveTime::from_hms_opt(10, 0, 0).unwrap();

    if candidate_date == now_local.date_naive() && now_local.time() >= ten_am {
        candidate_date += chrono::Duration::days(7);
    }

    let target_local = tz
        .from_local_datetime(&candidate_date.and_time(ten_am))
        .single()
        .ok_or_else(|| crate::error::Error::InvalidInput("ambiguous sweeper fire time".into()))?;

    let delta = target_local.with_timezone(&Utc) - Utc::now();
    Ok(delta.to_std().unwrap_or(StdDuration::from_secs(60)))
}

async fn sweep_once(store: &Store, transport: &dyn ChatTransport, sleeping_threshold_days: i64, reactivation_cooldown_days: i64) -> crate::error::Result<()> {
    let dormant = store.dormant_clients(sleeping_threshold_days, reactivation_cooldown_days).await?;
    log::info!("dormant-client sweep found {} candidate(s)", dormant.len());

    for client in dormant {
        let outcome = transport
            .send_message(OutboundMessage::plain(
                client.external_user_id,
                "It's been a while — we'd love to see you again. Book your next visit whenever you're ready.",
            ))
            .await;

        match outcome {
            Ok(()) => {
                store.set_client_reactivated(client.id).await?;
                store
                    .create_event(
                        crate::domain::EventType::ClientReactivated,
                        crate::domain::ActorKind::Scheduler,
                        client.id,
                        crate::domain::event::NewEvent::for_client(client.id),
                    )
                    .await?;
            }
            Err(crate::error::Error::TransportUserBlocked) => {
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
            Err(e) => {
                log::warn!("reactivation message to client {} failed: {e}", client.id);
            }
        }
    }
    Ok(())
}
