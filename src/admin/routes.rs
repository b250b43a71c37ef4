use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/dashboard", get(dashboard))
        .route("/master", put(update_master))
        .route("/services", get(list_services).post(create_service))
        .route("/services/{id}", post(set_service_active))
        .route("/prices", post(set_price))
        .route("/blackouts", get(list_blackouts).post(create_blackout))
}

fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    headers.get("X-Admin-Session").and_then(|v| v.to_str().ok()).and_then(|s| Uuid::parse_str(s).ok())
}

async fn require_session(state: &AppState, headers: &HeaderMap) -> crate::error::Result<i64> {
    let session_id = session_id_from_headers(headers).ok_or(crate::error::Error::NotAuthorized)?;
    state.admin_sessions.authenticate(session_id).ok_or(crate::error::Error::NotAuthorized)
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub fields: BTreeMap<String, String>,
}

async fn login(State(state): State<Arc<AppState>>, Json(req): Json<LoginRequest>) -> impl IntoResponse {
    if !crate::admin::auth::verify_login_payload(&req.fields, &state.config.transport_bot_token) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid login payload" })));
    }
    let Some(external_id) = req.fields.get("id").and_then(|s| s.parse::<i64>().ok()) else {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "missing id" })));
    };
    let master = match state.store.first_master().await {
        Ok(Some(m)) => m,
        _ => return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "no master configured" }))),
    };
    if master.external_user_id != external_id {
        return (StatusCode::FORBIDDEN, Json(json!({ "error": "not the master" })));
    }
    let session_id = state.admin_sessions.create(master.id);
    (StatusCode::OK, Json(json!({ "session": session_id.to_string() })))
}

async fn dashboard(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let master_id = match require_session(&state, &headers).await {
        Ok(id) => id,
        Err(_) => return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" }))),
    };
    let master = match state.store.master_by_id(master_id).await {
        Ok(Some(m)) => m,
        _ => return (StatusCode::NOT_FOUND, Json(json!({ "error": "master not found" }))),
    };

    let now = Utc::now();
    let today_range = match crate::slots::work_window(&master, now.date_naive()) {
        Ok(w) => w,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "invalid master timezone" }))),
    };
    let today_active = state.store.for_master_in_range(master.id, today_range.0, today_range.1).await.unwrap_or_default();
    let upcoming_unconfirmed = state.store.unconfirmed_upcoming(master.id, now, now + chrono::Duration::days(7)).await.unwrap_or_default();

    (
        StatusCode::OK,
        Json(json!({
            "today_active": today_active,
            "upcoming_unconfirmed": upcoming_unconfirmed,
        })),
    )
}

#[derive(Debug, Deserialize)]
pub struct UpdateMasterRequest {
    pub display_name: String,
    pub timezone: String,
    pub work_start_time: NaiveTime,
    pub work_end_time: NaiveTime,
    pub buffer_min: i32,
}

async fn update_master(State(state): State<Arc<AppState>>, headers: HeaderMap, Json(req): Json<UpdateMasterRequest>) -> impl IntoResponse {
    let master_id = match require_session(&state, &headers).await {
        Ok(id) => id,
        Err(_) => return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" }))),
    };
    match state
        .store
        .update_master_profile(master_id, &req.display_name, &req.timezone, req.work_start_time, req.work_end_time, req.buffer_min)
        .await
    {
        Ok(master) => (StatusCode::OK, Json(json!(master))),
        Err(e) => (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))),
    }
}

async fn list_services(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    if require_session(&state, &headers).await.is_err() {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" })));
    }
    match state.store.active_services().await {
        Ok(services) => (StatusCode::OK, Json(json!(services))),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    pub name: String,
    pub duration_min: i32,
}

async fn create_service(State(state): State<Arc<AppState>>, headers: HeaderMap, Json(req): Json<CreateServiceRequest>) -> impl IntoResponse {
    if require_session(&state, &headers).await.is_err() {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" })));
    }
    match state.store.create_service(&req.name, req.duration_min).await {
        Ok(service) => (StatusCode::OK, Json(json!(service))),
        Err(e) => (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))),
    }
}

#[derive(Debug, Deserialize)]
pub struct SetServiceActiveRequest {
    pub active: bool,
}

async fn set_service_active(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<SetServiceActiveRequest>,
) -> impl IntoResponse {
    if require_session(&state, &headers).await.is_err() {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" })));
    }
    match state.store.set_service_active(id, req.active).await {
        Ok(service) => {
            let _ = state
                .store
                .create_event(
                    crate::domain::EventType::ServiceUpdated,
                    crate::domain::ActorKind::Admin,
                    id,
                    crate::domain::event::NewEvent::default(),
                )
                .await;
            (StatusCode::OK, Json(json!(service)))
        }
        Err(e) => (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))),
    }
}

#[derive(Debug, Deserialize)]
pub struct SetPriceRequest {
    pub master_id: i64,
    pub service_id: i64,
    pub price: Decimal,
    pub active_from: NaiveDate,
}

async fn set_price(State(state): State<Arc<AppState>>, headers: HeaderMap, Json(req): Json<SetPriceRequest>) -> impl IntoResponse {
    if require_session(&state, &headers).await.is_err() {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" })));
    }
    match state.store.set_price(req.master_id, req.service_id, req.price, req.active_from).await {
        Ok(price) => {
            let _ = state
                .store
                .create_event(
                    crate::domain::EventType::PriceChanged,
                    crate::domain::ActorKind::Admin,
                    req.master_id,
                    crate::domain::event::NewEvent::default(),
                )
                .await;
            (StatusCode::OK, Json(json!(price)))
        }
        Err(e) => (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))),
    }
}

async fn list_blackouts(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let master_id = match require_session(&state, &headers).await {
        Ok(id) => id,
        Err(_) => return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" }))),
    };
    let now = Utc::now();
    match state.store.blackouts_overlapping(master_id, now, now + chrono::Duration::days(365)).await {
        Ok(blackouts) => (StatusCode::OK, Json(json!(blackouts))),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))),
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateBlackoutRequest {
    pub master_id: i64,
    pub start_ts: DateTime<Utc>,
    pub end_ts: DateTime<Utc>,
    pub reason: Option<String>,
}

async fn create_blackout(State(state): State<Arc<AppState>>, headers: HeaderMap, Json(req): Json<CreateBlackoutRequest>) -> impl IntoResponse {
    let master_id = match require_session(&state, &headers).await {
        Ok(id) => id,
        Err(_) => return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthorized" }))),
    };
    let master = match state.store.master_by_id(req.master_id).await {
        Ok(Some(m)) => m,
        _ => return (StatusCode::NOT_FOUND, Json(json!({ "error": "master not found" }))),
    };
    match crate::booking::blackout_conflicts(&state.store, &master, req.start_ts, req.end_ts).await {
        Ok(true) => return (StatusCode::CONFLICT, Json(json!({ "error": "blackout conflicts with an active appointment" }))),
        Ok(false) => {}
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": e.to_string() }))),
    }
    match state.store.create_blackout(req.master_id, req.start_ts, req.end_ts, req.reason, Some(master_id)).await {
        Ok(blackout) => {
            let _ = state
                .store
                .create_event(
                    crate::domain::EventType::BlackoutCreated,
                    crate::domain::ActorKind::Admin,
                    master_id,
                    crate::domain::event::NewEvent::default(),
                )
                .await;
            (StatusCode::OK, Json(json!(blackout)))
        }
        Err(e) => (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))),
    }
}
