//! Per-user booking dialogue state, keyed in a
//! `Mutex<HashMap<ExternalUserId, FlowState>>`. An in-memory registry is
//! sufficient since this runs as a single process.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FlowState {
    #[default]
    Idle,
    ChoosingService,
    ChoosingDay { service_id: i64, duration_min: i32 },
    ChoosingTime { service_id: i64, duration_min: i32, chosen_date: NaiveDate },
    Confirming { service_id: i64, duration_min: i32, chosen_date: NaiveDate, chosen_start: DateTime<Utc> },
}

/// In-process registry of per-user flow state, keyed by external user id.
#[derive(Default)]
pub struct FlowRegistry {
    states: Mutex<HashMap<i64, FlowState>>,
}

impl FlowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, external_user_id: i64) -> FlowState {
        self.states.lock().unwrap().get(&external_user_id).cloned().unwrap_or_default()
    }

    pub fn set(&self, external_user_id: i64, state: FlowState) {
        self.states.lock().unwrap().insert(external_user_id, state);
    }

    /// Cancelling via back-button, a successful confirm, or a `SlotAlreadyTaken`
    /// failure all return the user to `idle` by clearing their entry.
    pub fn clear(&self, external_user_id: i64) {
        self.states.lock().unwrap().remove(&external_user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_user_starts_idle() {
        let registry = FlowRegistry::new();
        assert_eq!(registry.get(99), FlowState::Idle);
    }

    #[test]
    fn set_then_clear_round_trips_to_idle() {
        let registry = FlowRegistry::new();
        registry.set(1, FlowState::ChoosingService);
        assert_eq!(registry.get(1), FlowState::ChoosingService);
        registry.clear(1);
        assert_eq!(registry.get(1), FlowState::Idle);
    }
}
