//! Inbound HTTP surface: the chat webhook and the liveness probe. Admin
//! routes live in `crate::admin`; both get mounted onto one `axum::Router`
//! by `main`.

pub mod health;
pub mod webhook;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health))
        .route("/webhook", post(webhook::webhook))
}
