//! Parses the opaque callback-data strings the chat transport echoes back.
//! `book_confirm:<service_id>:<ISO8601>` is the one pattern that needs care:
//! the timestamp itself contains colons, so the split must stop after the
//! first two separators.

use chrono::{DateTime, NaiveDate, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Callback {
    Menu,
    BookStart,
    MyAppointments,
    Unsubscribe,
    ServiceChosen(i64),
    DayChosen(NaiveDate),
    SlotChosen(DateTime<Utc>),
    BookConfirm { service_id: i64, start_ts: DateTime<Utc> },
    AptConfirm(i64),
    AptCancelAsk(i64),
    AptCancelConfirm(i64),
    /// Emitted by the 3h reminder keyboard; routes to the same cancel path
    /// as `AptCancelAsk` since no distinct handler for it exists upstream.
    AptCancel(i64),
    MasterToday,
    MasterTomorrow,
    Master7Days,
    MasterStatuses,
    MasterArrived(i64),
    MasterDone(i64),
    MasterCancel(i64),
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unrecognized callback data: {0}")]
    Unrecognized(String),
    #[error("malformed argument in callback data: {0}")]
    MalformedArgument(String),
}

pub fn parse(data: &str) -> Result<Callback, ParseError> {
    match data {
        "menu" => return Ok(Callback::Menu),
        "book_start" => return Ok(Callback::BookStart),
        "my_appointments" => return Ok(Callback::MyAppointments),
        "unsubscribe" => return Ok(Callback::Unsubscribe),
        "master_today" => return Ok(Callback::MasterToday),
        "master_tomorrow" => return Ok(Callback::MasterTomorrow),
        "master_7days" => return Ok(Callback::Master7Days),
        "master_statuses" => return Ok(Callback::MasterStatuses),
        _ => {}
    }

    if let Some(rest) = data.strip_prefix("book_confirm:") {
        // Split on the first colon only: everything after it is
        // `<service_id>:<ISO8601>`, and the timestamp has colons of its own.
        let (service_id_str, ts_str) = rest
            .split_once(':')
            .ok_or_else(|| ParseError::MalformedArgument(data.to_string()))?;
        let service_id = parse_i64(service_id_str, data)?;
        let start_ts = parse_ts(ts_str, data)?;
        return Ok(Callback::BookConfirm { service_id, start_ts });
    }

    if let Some(rest) = data.strip_prefix("svc:") {
        return Ok(Callback::ServiceChosen(parse_i64(rest, data)?));
    }
    if let Some(rest) = data.strip_prefix("day:") {
        let date = NaiveDate::parse_from_str(rest, "%Y-%m-%d").map_err(|_| ParseError::MalformedArgument(data.to_string()))?;
        return Ok(Callback::DayChosen(date));
    }
    if let Some(rest) = data.strip_prefix("slot:") {
        return Ok(Callback::SlotChosen(parse_ts(rest, data)?));
    }
    if let Some(rest) = data.strip_prefix("apt_confirm:") {
        return Ok(Callback::AptConfirm(parse_i64(rest, data)?));
    }
    if let Some(rest) = data.strip_prefix("apt_cancel_ask:") {
        return Ok(Callback::AptCancelAsk(parse_i64(rest, data)?));
    }
    if let Some(rest) = data.strip_prefix("apt_cancel_confirm:") {
        return Ok(Callback::AptCancelConfirm(parse_i64(rest, data)?));
    }
    if let Some(rest) = data.strip_prefix("apt_cancel:") {
        return Ok(Callback::AptCancel(parse_i64(rest, data)?));
    }
    if let Some(rest) = data.strip_prefix("master_arrived:") {
        return Ok(Callback::MasterArrived(parse_i64(rest, data)?));
    }
    if let Some(rest) = data.strip_prefix("master_done:") {
        return Ok(Callback::MasterDone(parse_i64(rest, data)?));
    }
    if let Some(rest) = data.strip_prefix("master_cancel:") {
        return Ok(Callback::MasterCancel(parse_i64(rest, data)?));
    }

    Err(ParseError::Unrecognized(data.to_string()))
}

fn parse_i64(s: &str, original: &str) -> Result<i64, ParseError> {
    s.parse().map_err(|_| ParseError::MalformedArgument(original.to_string()))
}

fn parse_ts(s: &str, original: &str) -> Result<DateTime<Utc>, ParseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ParseError::MalformedArgument(original.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_book_confirm_on_first_two_colons_only() {
        let cb = parse("book_confirm:42:2026-08-01T11:00:00+00:00").unwrap();
        assert_eq!(
            cb,
            Callback::BookConfirm { service_id: 42, start_ts: DateTime::parse_from_rfc3339("2026-08-01T11:00:00+00:00").unwrap().with_timezone(&Utc) }
        );
    }

    #[test]
    fn apt_cancel_and_apt_cancel_ask_parse_distinctly() {
        assert_eq!(parse("apt_cancel:7").unwrap(), Callback::AptCancel(7));
        assert_eq!(parse("apt_cancel_ask:7").unwrap(), Callback::AptCancelAsk(7));
    }

    #[test]
    fn root_commands_parse() {
        assert_eq!(parse("menu").unwrap(), Callback::Menu);
        assert_eq!(parse("master_7days").unwrap(), Callback::Master7Days);
    }

    #[test]
    fn unrecognized_data_errors() {
        assert!(matches!(parse("not_a_thing"), Err(ParseError::Unrecognized(_))));
    }

    #[test]
    fn malformed_service_id_errors() {
        assert!(matches!(parse("svc:not-a-number"), Err(ParseError::MalformedArgument(_))));
    }
}
