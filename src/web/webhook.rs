use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::AppState;

/// The subset of an inbound chat-platform update this service cares about:
/// a callback-query press carrying opaque `data`, from a user identified by
/// `from_id` reachable at `chat_id`.
#[derive(Debug, Deserialize)]
pub struct InboundUpdate {
    pub from_id: i64,
    pub chat_id: i64,
    pub data: String,
}

/// Always returns 200 `{"ok": true}`, even when the business logic behind
/// the callback failed — the webhook handler must never raise to the
/// transport on a business failure, only commit or roll back cleanly.
pub async fn webhook(State(state): State<Arc<AppState>>, headers: HeaderMap, Json(update): Json<InboundUpdate>) -> impl IntoResponse {
    let provided_secret = headers.get("X-Webhook-Secret").and_then(|v| v.to_str().ok()).unwrap_or_default();
    if provided_secret != state.config.webhook_secret {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "ok": false })));
    }

    if let Err(e) = handle_update(&state, update).await {
        log::warn!("webhook update handling failed: {e}");
    }

    (StatusCode::OK, Json(json!({ "ok": true })))
}

async fn handle_update(state: &AppState, update: InboundUpdate) -> crate::error::Result<()> {
    let callback = match crate::chat::callback::parse(&update.data) {
        Ok(cb) => cb,
        Err(e) => {
            log::warn!("unparseable callback data from {}: {e}", update.from_id);
            return Ok(());
        }
    };

    let master = state.store.first_master().await?.ok_or(crate::error::Error::NotFound)?;

    let client = match state.store.client_by_external_user_id(update.from_id).await? {
        Some(c) => c,
        None => state.store.create_client(update.from_id, update.chat_id).await?,
    };

    if client.needs_reactivation_event() {
        state.store.set_client_status(client.id, crate::domain::ClientStatus::Active).await?;
        state
            .store
            .create_event(
                crate::domain::EventType::ClientReactivated,
                crate::domain::ActorKind::Client,
                client.id,
                crate::domain::event::NewEvent::for_client(client.id),
            )
            .await?;
    }

    let reply = crate::chat::handle(&state.store, &master, &client, &state.flows, callback).await?;
    state.transport.send_message(reply).await?;
    Ok(())
}
