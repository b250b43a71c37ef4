//! Master-role command surface: schedule queries and per-appointment
//! actions, gated by "the caller's external id matches the master record".

use chrono::{Duration, NaiveTime, TimeZone, Utc};

use crate::domain::event::ActorKind;
use crate::domain::{Appointment, Master};
use crate::error::{Error, Result};
use crate::store::Store;

pub fn is_master(master: &Master, caller_external_user_id: i64) -> bool {
    master.external_user_id == caller_external_user_id
}

fn require_master(master: &Master, caller_external_user_id: i64) -> Result<()> {
    if is_master(master, caller_external_user_id) {
        Ok(())
    } else {
        Err(Error::NotAuthorized)
    }
}

pub async fn schedule_today(store: &Store, master: &Master, caller_external_user_id: i64) -> Result<Vec<Appointment>> {
    require_master(master, caller_external_user_id)?;
    day_range(store, master, 0).await
}

pub async fn schedule_tomorrow(store: &Store, master: &Master, caller_external_user_id: i64) -> Result<Vec<Appointment>> {
    require_master(master, caller_external_user_id)?;
    day_range(store, master, 1).await
}

pub async fn schedule_7days(store: &Store, master: &Master, caller_external_user_id: i64) -> Result<Vec<Appointment>> {
    require_master(master, caller_external_user_id)?;
    let tz = master.tz()?;
    let now_local = Utc::now().with_timezone(&tz);
    let start = tz
        .from_local_datetime(&now_local.date_naive().and_time(NaiveTime::MIN))
        .single()
        .ok_or_else(|| Error::InvalidInput("ambiguous local midnight".into()))?
        .with_timezone(&Utc);
    let end = start + Duration::days(7);
    store.for_master_in_range(master.id, start, end).await
}

async fn day_range(store: &Store, master: &Master, offset_days: i64) -> Result<Vec<Appointment>> {
    let tz = master.tz()?;
    let now_local = Utc::now().with_timezone(&tz);
    let day = now_local.date_naive() + Duration::days(offset_days);
    let start = tz
        .from_local_datetime(&day.and_time(NaiveTime::MIN))
        .single()
        .ok_or_else(|| Error::InvalidInput("ambiguous local midnight".into()))?
        .with_timezone(&Utc);
    let end = start + Duration::days(1);
    store.for_master_in_range(master.id, start, end).await
}

pub async fn mark_arrived(store: &Store, master: &Master, caller_external_user_id: i64, appointment_id: i64) -> Result<Appointment> {
    require_master(master, caller_external_user_id)?;
    crate::booking::mark_arrived(store, appointment_id, ActorKind::Master, master.id).await
}

pub async fn mark_done(store: &Store, master: &Master, caller_external_user_id: i64, appointment_id: i64) -> Result<Appointment> {
    require_master(master, caller_external_user_id)?;
    crate::booking::mark_done(store, appointment_id, ActorKind::Master, master.id, Utc::now()).await
}

pub async fn cancel(store: &Store, master: &Master, caller_external_user_id: i64, appointment_id: i64) -> Result<Appointment> {
    require_master(master, caller_external_user_id)?;
    crate::booking::cancel(store, appointment_id, ActorKind::Master, master.id, Utc::now()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime as NT;

    fn sample_master() -> Master {
        Master {
            id: 1,
            display_name: "Alex".into(),
            external_user_id: 555,
            timezone: "Europe/Berlin".into(),
            work_start_time: NT::from_hms_opt(9, 0, 0).unwrap(),
            work_end_time: NT::from_hms_opt(20, 0, 0).unwrap(),
            buffer_min: 10,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn caller_must_match_master_external_id() {
        let master = sample_master();
        assert!(is_master(&master, 555));
        assert!(!is_master(&master, 1));
    }
}
