use chrono::NaiveTime;
use std::time::Duration;

use crate::error::{Error, Result};

fn require(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| Error::InvalidInput(format!("required environment variable not set: {key}")))
}

fn optional_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Process-wide configuration, loaded once from the environment at startup.
///
/// `Master.buffer_min`/`work_start_time`/`work_end_time` are the per-master
/// authoritative source once a master row exists; these are only the seed
/// values used when bootstrapping the first master.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub webhook_secret: String,
    pub transport_base_url: String,
    pub transport_bot_token: String,
    pub bind_addr: String,

    pub timezone: String,
    pub booking_horizon_days: i64,
    pub min_booking_ahead_hours: i64,
    pub default_buffer_min: i64,
    pub buffer_options: [i64; 3],
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub service_duration_min: i64,
    pub sleeping_threshold_days: i64,
    pub reactivation_cooldown_days: i64,
    pub admin_session_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let work_start = optional_or("WORK_START", "09:00");
        let work_end = optional_or("WORK_END", "20:00");

        Ok(Self {
            database_url: require("DATABASE_URL")?,
            webhook_secret: require("WEBHOOK_SECRET")?,
            transport_base_url: require("TRANSPORT_BASE_URL")?,
            transport_bot_token: require("TRANSPORT_BOT_TOKEN")?,
            bind_addr: optional_or("BIND_ADDR", "0.0.0.0:8000"),

            timezone: optional_or("TIMEZONE", "Europe/Moscow"),
            booking_horizon_days: parse_or("BOOKING_HORIZON_DAYS", 7),
            min_booking_ahead_hours: parse_or("MIN_BOOKING_AHEAD_HOURS", 1),
            default_buffer_min: parse_or("DEFAULT_BUFFER_MIN", 10),
            buffer_options: [5, 10, 15],
            work_start: NaiveTime::parse_from_str(&work_start, "%H:%M")
                .map_err(|e| Error::InvalidInput(format!("WORK_START: {e}")))?,
            work_end: NaiveTime::parse_from_str(&work_end, "%H:%M")
                .map_err(|e| Error::InvalidInput(format!("WORK_END: {e}")))?,
            service_duration_min: parse_or("SERVICE_DURATION_MIN", 30),
            sleeping_threshold_days: parse_or("SLEEPING_THRESHOLD_DAYS", 90),
            reactivation_cooldown_days: parse_or("REACTIVATION_COOLDOWN_DAYS", 90),
            admin_session_ttl: Duration::from_secs(parse_or("ADMIN_SESSION_TTL_HOURS", 24u64) * 3600),
        })
    }
}
