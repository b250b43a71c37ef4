use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use uuid::Uuid;

struct Session {
    master_id: i64,
    created_at: Instant,
}

/// Minimal in-memory session map: a `uuid` session id to the authenticated
/// master id, with a fixed TTL. Not durable across restarts — acceptable
/// since admin session infrastructure proper is explicitly out of scope.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self { sessions: Mutex::new(HashMap::new()), ttl }
    }

    pub fn create(&self, master_id: i64) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.lock().unwrap().insert(id, Session { master_id, created_at: Instant::now() });
        id
    }

    /// Returns the authenticated master id if `id` names a live, unexpired
    /// session.
    pub fn authenticate(&self, id: Uuid) -> Option<i64> {
        let sessions = self.sessions.lock().unwrap();
        let session = sessions.get(&id)?;
        if session.created_at.elapsed() > self.ttl {
            return None;
        }
        Some(session.master_id)
    }

    pub fn revoke(&self, id: Uuid) {
        self.sessions.lock().unwrap().remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_authenticates() {
        let store = SessionStore::new(Duration::from_secs(3600));
        let id = store.create(7);
        assert_eq!(store.authenticate(id), Some(7));
    }

    #[test]
    fn revoked_session_does_not_authenticate() {
        let store = SessionStore::new(Duration::from_secs(3600));
        let id = store.create(7);
        store.revoke(id);
        assert_eq!(store.authenticate(id), None);
    }

    #[test]
    fn unknown_session_does_not_authenticate() {
        let store = SessionStore::new(Duration::from_secs(3600));
        assert_eq!(store.authenticate(Uuid::new_v4()), None);
    }
}
