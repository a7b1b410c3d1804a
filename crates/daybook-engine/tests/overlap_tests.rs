//! Tests for the overlap validator: predicate, admit/reject decisions, conflict listing.

use chrono::NaiveDate;
use daybook_engine::overlap::{can_admit, find_conflicts, overlaps, Booking, Decision};
use daybook_engine::Interval;

/// Helper to create an Interval on a given day from `HH:mm` strings.
fn interval(date: &str, start: &str, end: &str) -> Interval {
    Interval::new(
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        start.parse().unwrap(),
        end.parse().unwrap(),
    )
    .unwrap()
}

fn booking(id: u32, date: &str, start: &str, end: &str) -> Booking<u32> {
    Booking::new(id, interval(date, start, end))
}

// ── overlaps ────────────────────────────────────────────────────────────────

#[test]
fn touching_boundary_is_not_overlap() {
    let a = interval("2024-06-01", "09:00", "10:00");
    let b = interval("2024-06-01", "10:00", "11:00");
    assert!(!overlaps(&a, &b));
    assert!(!overlaps(&b, &a));
}

#[test]
fn one_minute_past_boundary_overlaps() {
    let a = interval("2024-06-01", "09:00", "10:01");
    let b = interval("2024-06-01", "10:00", "11:00");
    assert!(overlaps(&a, &b));
    assert!(overlaps(&b, &a));
}

#[test]
fn containment_and_identity_overlap() {
    let outer = interval("2024-06-01", "09:00", "12:00");
    let inner = interval("2024-06-01", "10:00", "11:00");
    assert!(overlaps(&outer, &inner));
    assert!(overlaps(&inner, &outer));
    assert!(overlaps(&inner, &inner));
}

#[test]
fn same_times_on_different_days_never_overlap() {
    let a = interval("2024-06-01", "09:00", "10:00");
    let b = interval("2024-06-02", "09:00", "10:00");
    assert!(!overlaps(&a, &b));
}

// ── can_admit ───────────────────────────────────────────────────────────────

#[test]
fn empty_day_admits() {
    let candidate = interval("2024-06-01", "09:00", "10:00");
    let existing: Vec<Booking<u32>> = Vec::new();
    assert_eq!(can_admit(&candidate, &existing, None), Decision::Admit);
}

#[test]
fn first_conflict_is_reported() {
    let existing = vec![
        booking(1, "2024-06-01", "08:00", "09:00"),
        booking(2, "2024-06-01", "09:30", "10:00"),
        booking(3, "2024-06-01", "10:15", "11:00"),
    ];
    let candidate = interval("2024-06-01", "09:45", "10:30");

    assert_eq!(
        can_admit(&candidate, &existing, None),
        Decision::Reject { conflicting_id: 2 }
    );
}

#[test]
fn excluded_id_is_skipped() {
    let existing = vec![booking(7, "2024-06-01", "09:00", "10:00")];
    let candidate = interval("2024-06-01", "09:00", "10:00");

    assert_eq!(
        can_admit(&candidate, &existing, None),
        Decision::Reject { conflicting_id: 7 }
    );
    assert_eq!(can_admit(&candidate, &existing, Some(&7)), Decision::Admit);
}

#[test]
fn excluding_one_id_still_checks_the_others() {
    let existing = vec![
        booking(1, "2024-06-01", "09:00", "10:00"),
        booking(2, "2024-06-01", "10:00", "11:00"),
    ];
    let candidate = interval("2024-06-01", "09:30", "10:30");
    assert_eq!(
        can_admit(&candidate, &existing, Some(&1)),
        Decision::Reject { conflicting_id: 2 }
    );
}

#[test]
fn wrongly_filtered_other_day_entries_do_not_conflict() {
    let existing = vec![booking(1, "2024-06-02", "09:00", "10:00")];
    let candidate = interval("2024-06-01", "09:00", "10:00");
    assert_eq!(can_admit(&candidate, &existing, None), Decision::Admit);
}

#[test]
fn range_check_precedes_any_existing_events() {
    // An inverted range never reaches the validator, whatever is booked.
    let result = daybook_engine::normalize("2024-06-01", "10:00", "09:00");
    assert!(matches!(
        result,
        Err(daybook_engine::ScheduleError::InvalidRange { .. })
    ));
}

#[test]
fn end_to_end_scenario() {
    let existing = vec![booking(1, "2024-06-01", "09:00", "10:00")];

    let overlapping = interval("2024-06-01", "09:30", "10:30");
    assert_eq!(
        can_admit(&overlapping, &existing, None),
        Decision::Reject { conflicting_id: 1 }
    );

    let back_to_back = interval("2024-06-01", "10:00", "11:00");
    assert_eq!(can_admit(&back_to_back, &existing, None), Decision::Admit);

    let next_day = interval("2024-06-02", "09:30", "10:30");
    assert_eq!(can_admit(&next_day, &existing, None), Decision::Admit);

    let moved_earlier = interval("2024-06-01", "08:00", "09:30");
    assert_eq!(can_admit(&moved_earlier, &existing, Some(&1)), Decision::Admit);
}

#[test]
fn decision_serializes_tagged() {
    let admit: Decision<u32> = Decision::Admit;
    assert_eq!(
        serde_json::to_value(&admit).unwrap(),
        serde_json::json!({"decision": "admit"})
    );
    let reject: Decision<u32> = Decision::Reject { conflicting_id: 3 };
    assert_eq!(
        serde_json::to_value(&reject).unwrap(),
        serde_json::json!({"decision": "reject", "conflicting_id": 3})
    );
    assert!(admit.is_admit());
    assert!(!reject.is_admit());
}

// ── find_conflicts ──────────────────────────────────────────────────────────

#[test]
fn all_conflicts_found_with_overlap_minutes() {
    let existing = vec![
        booking(1, "2024-06-01", "08:00", "09:15"),
        booking(2, "2024-06-01", "09:30", "09:45"),
        booking(3, "2024-06-01", "11:00", "12:00"),
        booking(4, "2024-06-01", "10:30", "11:30"),
    ];
    let candidate = interval("2024-06-01", "09:00", "11:00");

    let conflicts = find_conflicts(&candidate, &existing, None);

    let summary: Vec<(u32, i64)> = conflicts
        .iter()
        .map(|c| (c.booking.id, c.overlap_minutes))
        .collect();
    assert_eq!(summary, vec![(1, 15), (2, 15), (4, 30)]);
}

#[test]
fn find_conflicts_honors_exclusion() {
    let existing = vec![
        booking(1, "2024-06-01", "09:00", "10:00"),
        booking(2, "2024-06-01", "09:30", "10:30"),
    ];
    let candidate = interval("2024-06-01", "09:00", "10:00");

    let conflicts = find_conflicts(&candidate, &existing, Some(&1));
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].booking.id, 2);
    assert_eq!(conflicts[0].overlap_minutes, 30);
}
