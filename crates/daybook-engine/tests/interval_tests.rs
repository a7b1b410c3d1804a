//! Tests for the interval model: date truncation, `HH:mm` parsing, range validity.

use chrono::NaiveDate;
use daybook_engine::interval::{normalize, parse_date, Interval, TimeOfDay};
use daybook_engine::ScheduleError;

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn time(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

// ── TimeOfDay ───────────────────────────────────────────────────────────────

#[test]
fn time_accepts_zero_padded_and_single_digit_hours() {
    assert_eq!(time("09:05").minute_of_day(), 9 * 60 + 5);
    assert_eq!(time("9:05"), time("09:05"));
    assert_eq!(time("00:00"), TimeOfDay::MIDNIGHT);
    assert_eq!(time("23:59"), TimeOfDay::LAST_MINUTE);
}

#[test]
fn time_displays_zero_padded() {
    assert_eq!(time("7:30").to_string(), "07:30");
    assert_eq!(TimeOfDay::from_hm(14, 0).unwrap().to_string(), "14:00");
}

#[test]
fn time_rejects_out_of_pattern_input() {
    for bad in ["24:00", "12:60", "12:5", "1200", "", " 09:00", "09:00:00", "ab:cd", "-1:00"] {
        assert!(bad.parse::<TimeOfDay>().is_err(), "'{}' should be rejected", bad);
    }
}

#[test]
fn time_order_matches_minute_of_day() {
    // "9:00" vs "10:00" would sort wrongly as raw strings; normalized values do not.
    assert!(time("9:00") < time("10:00"));
    assert_eq!(time("9:00").minutes_until(time("10:30")), 90);
    assert_eq!(time("10:30").minutes_until(time("9:00")), -90);
}

#[test]
fn time_serializes_as_string() {
    let json = serde_json::to_string(&time("8:15")).unwrap();
    assert_eq!(json, "\"08:15\"");
    let back: TimeOfDay = serde_json::from_str("\"8:15\"").unwrap();
    assert_eq!(back, time("08:15"));
    assert!(serde_json::from_str::<TimeOfDay>("\"25:00\"").is_err());
}

// ── Dates ───────────────────────────────────────────────────────────────────

#[test]
fn plain_date_parses() {
    assert_eq!(parse_date("2024-06-01").unwrap(), day(2024, 6, 1));
}

#[test]
fn time_of_day_noise_is_discarded() {
    let expected = day(2024, 6, 1);
    assert_eq!(parse_date("2024-06-01T00:00:00").unwrap(), expected);
    assert_eq!(parse_date("2024-06-01T23:59:59.999").unwrap(), expected);
    assert_eq!(parse_date("2024-06-01 18:30").unwrap(), expected);
    assert_eq!(parse_date("2024-06-01T18:30:00Z").unwrap(), expected);
}

#[test]
fn offset_does_not_shift_the_written_day() {
    // 23:30 at -05:00 is already June 2nd in UTC, but the calendar day as written wins.
    assert_eq!(
        parse_date("2024-06-01T23:30:00-05:00").unwrap(),
        day(2024, 6, 1)
    );
    assert_eq!(
        parse_date("2024-06-01T00:30:00+09:00").unwrap(),
        day(2024, 6, 1)
    );
}

#[test]
fn invalid_dates_are_malformed_input() {
    for bad in ["", "yesterday", "2024-13-01", "2024-02-30", "01/06/2024"] {
        match parse_date(bad) {
            Err(ScheduleError::MalformedInput { field, .. }) => assert_eq!(field, "date"),
            other => panic!("'{}' should be malformed, got {:?}", bad, other),
        }
    }
}

// ── normalize ───────────────────────────────────────────────────────────────

#[test]
fn normalize_builds_interval() {
    let interval = normalize("2024-06-01T08:00:00", "9:00", "10:30").unwrap();
    assert_eq!(interval.date(), day(2024, 6, 1));
    assert_eq!(interval.start(), time("09:00"));
    assert_eq!(interval.end(), time("10:30"));
    assert_eq!(interval.duration_minutes(), 90);
    assert_eq!(interval.to_string(), "2024-06-01 09:00-10:30");
}

#[test]
fn end_before_start_is_invalid_range() {
    match normalize("2024-06-01", "10:00", "09:00") {
        Err(ScheduleError::InvalidRange { start, end }) => {
            assert_eq!(start, time("10:00"));
            assert_eq!(end, time("09:00"));
        }
        other => panic!("expected InvalidRange, got {:?}", other),
    }
}

#[test]
fn zero_length_is_invalid_range() {
    assert!(matches!(
        normalize("2024-06-01", "10:00", "10:00"),
        Err(ScheduleError::InvalidRange { .. })
    ));
}

#[test]
fn malformed_times_name_their_field() {
    match normalize("2024-06-01", "25:00", "26:00") {
        Err(ScheduleError::MalformedInput { field, .. }) => assert_eq!(field, "start_time"),
        other => panic!("expected MalformedInput, got {:?}", other),
    }
    match normalize("2024-06-01", "09:00", "9") {
        Err(ScheduleError::MalformedInput { field, .. }) => assert_eq!(field, "end_time"),
        other => panic!("expected MalformedInput, got {:?}", other),
    }
}

#[test]
fn interval_deserialization_rechecks_range() {
    let ok: Interval =
        serde_json::from_str(r#"{"date":"2024-06-01","start_time":"09:00","end_time":"10:00"}"#)
            .unwrap();
    assert_eq!(ok, Interval::new(day(2024, 6, 1), time("09:00"), time("10:00")).unwrap());

    let inverted = serde_json::from_str::<Interval>(
        r#"{"date":"2024-06-01","start_time":"10:00","end_time":"09:00"}"#,
    );
    assert!(inverted.is_err());
}
