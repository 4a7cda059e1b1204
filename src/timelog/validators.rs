//! Syntax checks for form input.

use chrono::{NaiveDate, NaiveTime};

pub const DATE_FORMAT: &str = "%d/%m/%Y";
pub const TIME_FORMAT: &str = "%H:%M";

/// `DD/MM/YYYY` naming a real calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[2] == b'/'
        && bytes[5] == b'/'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || i == 5 || b.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Zero-padded `HH:MM` between 00:00 and 23:59.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 5
        && bytes[2] == b':'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 2 || b.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveTime::parse_from_str(value, TIME_FORMAT).ok()
}

pub fn validate_date(value: &str) -> bool {
    parse_date(value).is_some()
}

pub fn validate_time(value: &str) -> bool {
    parse_time(value).is_some()
}

/// Ticket ids are non-empty runs of ASCII digits.
pub fn validate_ticket(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dates() {
        assert!(validate_date("29/02/2024"));
        assert!(validate_date("01/12/1999"));
        assert!(!validate_date("29/02/2023"));
        assert!(!validate_date("1/12/1999"));
        assert!(!validate_date("2024-02-01"));
        assert!(!validate_date("32/01/2024"));
        assert!(!validate_date(""));
    }

    #[test]
    fn test_times() {
        assert!(validate_time("00:00"));
        assert!(validate_time("23:59"));
        assert!(!validate_time("24:00"));
        assert!(!validate_time("9:30"));
        assert!(!validate_time("12:60"));
        assert!(!validate_time("12h30"));
    }

    #[test]
    fn test_tickets() {
        assert!(validate_ticket("12345"));
        assert!(!validate_ticket(""));
        assert!(!validate_ticket("12a"));
        assert!(!validate_ticket("-1"));
    }
}
