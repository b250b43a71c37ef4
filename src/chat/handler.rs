//! Drives the `idle → choosing_service → choosing_day → choosing_time →
//! confirming → idle` dialogue. Each call handles one callback for one
//! client and returns the message(s) to send back; the caller (the webhook
//! handler) owns delivery via the transport.

use chrono::Utc;

use crate::chat::callback::Callback;
use crate::chat::flow::{FlowRegistry, FlowState};
use crate::domain::event::ActorKind;
use crate::domain::{Client, Master};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::transport::OutboundMessage;

pub async fn handle(
    store: &Store,
    master: &Master,
    client: &Client,
    flows: &FlowRegistry,
    callback: Callback,
) -> Result<OutboundMessage> {
    match callback {
        Callback::Menu | Callback::BookStart => {
            flows.set(client.external_user_id, FlowState::ChoosingService);
            let services = store.active_services().await?;
            let buttons = services.iter().map(|s| vec![(s.name.clone(), format!("svc:{}", s.id))]).collect();
            Ok(OutboundMessage::with_buttons(client.chat_id, "Choose a service:", buttons))
        }

        Callback::ServiceChosen(service_id) => {
            let service = store.service_by_id(service_id).await?.ok_or(Error::NotFound)?;
            flows.set(client.external_user_id, FlowState::ChoosingDay { service_id, duration_min: service.duration_min });
            let dates = crate::booking::available_dates_for(store, master, service_id, Utc::now().date_naive(), 7, Utc::now(), 1).await?;
            let buttons = dates.iter().map(|d| vec![(d.to_string(), format!("day:{d}"))]).collect();
            Ok(OutboundMessage::with_buttons(client.chat_id, "Choose a day:", buttons))
        }

        Callback::DayChosen(chosen_date) => {
            let state = flows.get(client.external_user_id);
            let FlowState::ChoosingDay { service_id, duration_min } = state else {
                return Ok(restart(flows, client, "Let's start over."));
            };
            flows.set(client.external_user_id, FlowState::ChoosingTime { service_id, duration_min, chosen_date });
            let slots = crate::booking::available_slots_for(store, master, service_id, chosen_date, Utc::now(), 1).await?;
            let buttons = slots.iter().map(|t| vec![(t.format("%H:%M").to_string(), format!("slot:{}", t.to_rfc3339()))]).collect();
            Ok(OutboundMessage::with_buttons(client.chat_id, "Choose a time:", buttons))
        }

        Callback::SlotChosen(chosen_start) => {
            let state = flows.get(client.external_user_id);
            let FlowState::ChoosingTime { service_id, duration_min, chosen_date } = state else {
                return Ok(restart(flows, client, "Let's start over."));
            };
            flows.set(client.external_user_id, FlowState::Confirming { service_id, duration_min, chosen_date, chosen_start });
            let confirm_data = format!("book_confirm:{service_id}:{}", chosen_start.to_rfc3339());
            Ok(OutboundMessage::with_buttons(
                client.chat_id,
                "Confirm your booking?",
                vec![vec![("Confirm".into(), confirm_data)]],
            ))
        }

        Callback::BookConfirm { service_id, start_ts } => {
            let result = crate::booking::book(store, master, client.id, service_id, start_ts, Utc::now()).await;
            flows.clear(client.external_user_id);
            match result {
                Ok(_apt) => Ok(OutboundMessage::plain(client.chat_id, "Booked! We'll remind you before your visit.")),
                Err(Error::SlotAlreadyTaken) => Ok(OutboundMessage::plain(client.chat_id, "Sorry, that slot was just taken. Please pick another.")),
                Err(e) => Err(e),
            }
        }

        Callback::AptConfirm(id) => {
            let apt = crate::booking::confirm(store, id, Utc::now()).await?;
            Ok(OutboundMessage::plain(client.chat_id, format!("Appointment #{} confirmed.", apt.id)))
        }

        Callback::AptCancelAsk(id) | Callback::AptCancel(id) => Ok(OutboundMessage::with_buttons(
            client.chat_id,
            "Cancel this appointment?",
            vec![vec![("Yes, cancel".into(), format!("apt_cancel_confirm:{id}"))]],
        )),

        Callback::AptCancelConfirm(id) => {
            let apt = crate::booking::cancel(store, id, ActorKind::Client, client.id, Utc::now()).await?;
            Ok(OutboundMessage::plain(client.chat_id, format!("Appointment #{} cancelled.", apt.id)))
        }

        Callback::MyAppointments => {
            let upcoming = store.upcoming_for_client(client.id, Utc::now()).await?;
            if upcoming.is_empty() {
                Ok(OutboundMessage::plain(client.chat_id, "You have no upcoming appointments."))
            } else {
                let buttons = upcoming
                    .iter()
                    .map(|a| vec![(a.start_ts.format("%Y-%m-%d %H:%M").to_string(), format!("apt_cancel_ask:{}", a.id))])
                    .collect();
                Ok(OutboundMessage::with_buttons(client.chat_id, "Your upcoming appointments:", buttons))
            }
        }

        Callback::Unsubscribe => {
            store.set_client_status(client.id, crate::domain::ClientStatus::Unsubscribed).await?;
            store
                .create_event(
                    crate::domain::EventType::ClientUnsubscribed,
                    ActorKind::Client,
                    client.id,
                    crate::domain::event::NewEvent::for_client(client.id),
                )
                .await?;
            Ok(OutboundMessage::plain(client.chat_id, "You've been unsubscribed from reminders."))
        }

        Callback::MasterToday => {
            let appointments = crate::chat::master_flow::schedule_today(store, master, client.external_user_id).await?;
            Ok(OutboundMessage::plain(client.chat_id, schedule_summary(&appointments)))
        }
        Callback::MasterTomorrow => {
            let appointments = crate::chat::master_flow::schedule_tomorrow(store, master, client.external_user_id).await?;
            Ok(OutboundMessage::plain(client.chat_id, schedule_summary(&appointments)))
        }
        Callback::Master7Days => {
            let appointments = crate::chat::master_flow::schedule_7days(store, master, client.external_user_id).await?;
            Ok(OutboundMessage::plain(client.chat_id, schedule_summary(&appointments)))
        }
        Callback::MasterStatuses => {
            let appointments = crate::chat::master_flow::schedule_today(store, master, client.external_user_id).await?;
            Ok(OutboundMessage::plain(client.chat_id, schedule_summary(&appointments)))
        }
        Callback::MasterArrived(id) => {
            let apt = crate::chat::master_flow::mark_arrived(store, master, client.external_user_id, id).await?;
            Ok(OutboundMessage::plain(client.chat_id, format!("Appointment #{} marked arrived.", apt.id)))
        }
        Callback::MasterDone(id) => {
            let apt = crate::chat::master_flow::mark_done(store, master, client.external_user_id, id).await?;
            Ok(OutboundMessage::plain(client.chat_id, format!("Appointment #{} marked done.", apt.id)))
        }
        Callback::MasterCancel(id) => {
            let apt = crate::chat::master_flow::cancel(store, master, client.external_user_id, id).await?;
            Ok(OutboundMessage::plain(client.chat_id, format!("Appointment #{} cancelled.", apt.id)))
        }
    }
}

fn schedule_summary(appointments: &[crate::domain::Appointment]) -> String {
    if appointments.is_empty() {
        return "No appointments.".to_string();
    }
    appointments
        .iter()
        .map(|a| format!("#{} {} [{:?}]", a.id, a.start_ts.format("%Y-%m-%d %H:%M"), a.status))
        .collect::<Vec<_>>()
        .join("\n")
}

fn restart(flows: &FlowRegistry, client: &Client, text: &str) -> OutboundMessage {
    flows.clear(client.external_user_id);
    OutboundMessage::plain(client.chat_id, text)
}
