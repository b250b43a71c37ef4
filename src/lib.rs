pub mod admin;
pub mod booking;
pub mod chat;
pub mod config;
pub mod domain;
pub mod error;
pub mod logger;
pub mod reminders;
pub mod slots;
pub mod store;
pub mod sweeper;
pub mod transport;
pub mod web;

use std::sync::Arc;

use admin::SessionStore;
use chat::FlowRegistry;
use config::Config;
use store::Store;
use transport::ChatTransport;

/// Shared application state handed to every axum handler as `State<Arc<AppState>>`.
pub struct AppState {
    pub store: Store,
    pub transport: Arc<dyn ChatTransport>,
    pub config: Config,
    pub flows: FlowRegistry,
    pub admin_sessions: SessionStore,
}

impl AppState {
    pub fn new(store: Store, transport: Arc<dyn ChatTransport>, config: Config) -> Self {
        let admin_sessions = SessionStore::new(config.admin_session_ttl);
        Self { store, transport, config, flows: FlowRegistry::new(), admin_sessions }
    }
}
