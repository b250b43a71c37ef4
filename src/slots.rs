//! Slot availability computation. Pure functions over data the caller has
//! already fetched — no store access here — so the admissibility algorithm
//! is independently unit-testable.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use crate::domain::Master;
use crate::error::{Error, Result};

/// A half-open interval `[start, end)` that a candidate slot must not
/// overlap. For active appointments this is widened by the buffer on both
/// sides before comparison; for blackouts it is the raw window.
#[derive(Debug, Clone, Copy)]
pub struct BusyWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Resolves the work window `[open, close)` for `for_date` in the master's
/// zone, as UTC instants. The local wall-clock endpoints are interpreted in
/// the master's IANA zone exactly once; every later comparison in this
/// module is plain UTC arithmetic, so DST transitions on `for_date` cannot
/// introduce a non-monotonic step.
pub fn work_window(master: &Master, for_date: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let tz = master.tz()?;
    let open_local = for_date.and_time(master.work_start_time);
    let close_local = for_date.and_time(master.work_end_time);

    let open_utc = tz
        .from_local_datetime(&open_local)
        .single()
        .ok_or_else(|| Error::InvalidInput(format!("ambiguous local work-start on {for_date}")))?
        .with_timezone(&Utc);
    let close_utc = tz
        .from_local_datetime(&close_local)
        .single()
        .ok_or_else(|| Error::InvalidInput(format!("ambiguous local work-end on {for_date}")))?
        .with_timezone(&Utc);

    Ok((open_utc, close_utc))
}

/// Generates every candidate start in `[work_start, work_end)`, stepped by
/// `duration + buffer`, whose `[t, t+duration)` still fits before `work_end`.
fn candidate_starts(
    work_start: DateTime<Utc>,
    work_end: DateTime<Utc>,
    duration: Duration,
    buffer: Duration,
) -> Vec<DateTime<Utc>> {
    let step = duration + buffer;
    let mut starts = Vec::new();
    let mut t = work_start;
    while t + duration <= work_end {
        starts.push(t);
        t += step;
    }
    starts
}

/// A candidate `[t, t+duration)` is admissible iff none of the four
/// rejection conditions below disqualify it.
fn is_admissible(
    t: DateTime<Utc>,
    duration: Duration,
    buffer: Duration,
    now: DateTime<Utc>,
    min_lead: Duration,
    work_end: DateTime<Utc>,
    busy: &[BusyWindow],
    blackouts: &[BusyWindow],
) -> bool {
    if t < now + min_lead {
        return false;
    }
    if t + duration > work_end {
        return false;
    }

    let slot_end = t + duration;

    for b in busy {
        // Overlap test on the buffer-widened appointment window.
        if t < b.end + buffer && slot_end > b.start - buffer {
            return false;
        }
    }

    for bl in blackouts {
        if t < bl.end && slot_end > bl.start {
            return false;
        }
    }

    true
}

/// Computes every admissible start instant on `for_date`, in chronological
/// order.
pub fn available_slots(
    master: &Master,
    duration_min: i32,
    for_date: NaiveDate,
    now: DateTime<Utc>,
    min_booking_ahead_hours: i64,
    active_appointments: &[BusyWindow],
    blackouts: &[BusyWindow],
) -> Result<Vec<DateTime<Utc>>> {
    let (work_start, work_end) = work_window(master, for_date)?;
    let duration = Duration::minutes(duration_min as i64);
    let buffer = Duration::minutes(master.buffer_min as i64);
    let min_lead = Duration::hours(min_booking_ahead_hours);

    let candidates = candidate_starts(work_start, work_end, duration, buffer);

    Ok(candidates
        .into_iter()
        .filter(|&t| is_admissible(t, duration, buffer, now, min_lead, work_end, active_appointments, blackouts))
        .collect())
}

/// Returns every admissible start across the booking horizon (all offsets),
/// without filtering to dates that have at least one slot. Callers that only
/// need "which dates have anything free" should use `available_dates`.
pub struct HorizonDaySlots {
    pub date: NaiveDate,
    pub slots: Vec<DateTime<Utc>>,
}

/// A caller-provided source of per-day busy/blackout windows, so the pure
/// multi-day walk in this module stays decoupled from the store.
pub trait DayWindowSource {
    fn active_appointments_on(&self, date: NaiveDate) -> Vec<BusyWindow>;
    fn blackouts_on(&self, date: NaiveDate) -> Vec<BusyWindow>;
}

pub fn available_dates(
    master: &Master,
    duration_min: i32,
    today: NaiveDate,
    horizon_days: i64,
    now: DateTime<Utc>,
    min_booking_ahead_hours: i64,
    source: &dyn DayWindowSource,
) -> Result<Vec<NaiveDate>> {
    let mut out = Vec::new();
    for offset in 0..horizon_days {
        let day = today + Duration::days(offset);
        let busy = source.active_appointments_on(day);
        let blackouts = source.blackouts_on(day);
        let slots = available_slots(master, duration_min, day, now, min_booking_ahead_hours, &busy, &blackouts)?;
        if !slots.is_empty() {
            out.push(day);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn moscow_master() -> Master {
        Master {
            id: 1,
            display_name: "Irina".to_string(),
            external_user_id: 100,
            timezone: "Europe/Moscow".to_string(),
            work_start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            work_end_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            buffer_min: 10,
            created_at: Utc::now(),
        }
    }

    fn msk(date: NaiveDate, h: u32, m: u32) -> DateTime<Utc> {
        let tz: chrono_tz::Tz = "Europe/Moscow".parse().unwrap();
        tz.from_local_datetime(&date.and_hms_opt(h, m, 0).unwrap()).single().unwrap().with_timezone(&Utc)
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn now() -> DateTime<Utc> {
        msk(day(), 8, 0)
    }

    #[test]
    fn empty_day_starts_at_nine_forty_after_min_lead() {
        let master = moscow_master();
        let slots = available_slots(&master, 30, day(), now(), 1, &[], &[]).unwrap();
        assert_eq!(slots.first().copied(), Some(msk(day(), 9, 40)));
        assert_eq!(slots.len(), 16);
        assert_eq!(slots.last().copied(), Some(msk(day(), 19, 20)));
    }

    #[test]
    fn booking_at_eleven_removes_adjacent_slots_on_both_sides() {
        let master = moscow_master();
        let busy = [BusyWindow { start: msk(day(), 11, 0), end: msk(day(), 11, 30) }];
        let slots = available_slots(&master, 30, day(), now(), 1, &busy, &[]).unwrap();
        assert!(!slots.contains(&msk(day(), 10, 20)));
        assert!(!slots.contains(&msk(day(), 11, 0)));
        assert!(!slots.contains(&msk(day(), 11, 40)));
        assert!(slots.contains(&msk(day(), 9, 40)));
        assert!(slots.contains(&msk(day(), 12, 0)));
    }

    #[test]
    fn blackout_excludes_any_overlapping_slot() {
        let master = moscow_master();
        let blackouts = [BusyWindow { start: msk(day(), 14, 0), end: msk(day(), 16, 0) }];
        let slots = available_slots(&master, 30, day(), now(), 1, &[], &blackouts).unwrap();
        for excluded in [
            msk(day(), 13, 20),
            msk(day(), 14, 0),
            msk(day(), 14, 40),
            msk(day(), 15, 20),
            msk(day(), 16, 0),
        ] {
            assert!(!slots.contains(&excluded), "expected {excluded} to be excluded by the blackout");
        }
        assert!(slots.contains(&msk(day(), 16, 40)));
    }

    #[test]
    fn min_lead_rejects_slots_starting_before_the_threshold() {
        let master = moscow_master();
        let slots = available_slots(&master, 30, day(), now(), 1, &[], &[]).unwrap();
        assert!(slots.iter().all(|&t| t >= now() + Duration::hours(1)));
    }

    #[test]
    fn slot_past_work_end_is_never_generated() {
        let master = moscow_master();
        let slots = available_slots(&master, 30, day(), now(), 1, &[], &[]).unwrap();
        let duration = Duration::minutes(30);
        assert!(slots.iter().all(|&t| t + duration <= msk(day(), 20, 0)));
    }

    struct StaticSource {
        busy: Vec<BusyWindow>,
        blackouts: Vec<BusyWindow>,
    }

    impl DayWindowSource for StaticSource {
        fn active_appointments_on(&self, _date: NaiveDate) -> Vec<BusyWindow> {
            self.busy.clone()
        }
        fn blackouts_on(&self, _date: NaiveDate) -> Vec<BusyWindow> {
            self.blackouts.clone()
        }
    }

    #[test]
    fn available_dates_skips_days_fully_blacked_out() {
        let master = moscow_master();
        let blacked_day = day() + Duration::days(1);
        let source = StaticSource {
            busy: Vec::new(),
            blackouts: vec![BusyWindow {
                start: msk(blacked_day, 0, 0),
                end: msk(blacked_day, 23, 59),
            }],
        };
        let dates = available_dates(&master, 30, day(), 3, now(), 1, &source).unwrap();
        assert!(!dates.contains(&blacked_day));
        assert!(dates.contains(&day()));
    }
}
