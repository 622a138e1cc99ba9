mod common;

use chrono::{TimeDelta, Weekday};
use common::{date, make_log, make_med};
use doseline::core::calendar::{DAYS_AFTER, DAYS_BEFORE, MarkTone, marks_for_window, window};
use doseline::models::med::ALL_DAYS;

#[test]
fn test_window_bounds_for_mid_june() {
    let (start, end) = window(date("2024-06-15"));
    assert_eq!(start, date("2024-03-17"));
    assert_eq!(end, date("2024-09-12"));
    assert_eq!((end - start).num_days() + 1, 180);
    assert_eq!(DAYS_BEFORE + DAYS_AFTER + 1, 180);
}

#[test]
fn test_selected_date_flagged_without_activity() {
    let marks = marks_for_window(date("2024-06-15"), date("2024-06-15"), &[], &[]);
    assert_eq!(marks.len(), 1);
    let mark = marks[&date("2024-06-15")];
    assert!(mark.selected);
    assert!(!mark.has_activity);
    assert!(!mark.confirmed);
    assert_eq!(mark.tone(), None);
}

#[test]
fn test_marks_stay_inside_window() {
    let med = make_med("m1", "Daily", "2000-01-01", &["08:00"], &ALL_DAYS);
    let center = date("2024-06-15");
    let marks = marks_for_window(center, center, &[med], &[]);

    assert_eq!(marks.len(), 180);
    assert_eq!(marks.keys().next(), Some(&date("2024-03-17")));
    assert_eq!(marks.keys().last(), Some(&date("2024-09-12")));
}

#[test]
fn test_weekly_schedule_marks_only_matching_days() {
    let med = make_med("m1", "Weekly", "2024-06-01", &["08:00"], &[Weekday::Mon]);
    let center = date("2024-06-15");
    let marks = marks_for_window(center, center, &[med], &[]);

    for (day, mark) in &marks {
        if *day == center {
            continue;
        }
        assert_eq!(chrono::Datelike::weekday(day), Weekday::Mon, "{day}");
        assert!(*day >= date("2024-06-01"));
        assert!(mark.has_activity);
    }
    assert!(marks.contains_key(&date("2024-06-17")));
}

#[test]
fn test_confirmed_and_past_flags() {
    let center = date("2024-06-15");
    let today = date("2024-06-15");
    let logs = vec![
        make_log("l1", "gone", "2024-06-10 08:00"),
        make_log("l2", "gone", "2024-06-20 08:00"),
    ];
    let marks = marks_for_window(center, today, &[], &logs);

    let past = marks[&date("2024-06-10")];
    assert!(past.confirmed && past.is_past && past.has_activity);
    assert_eq!(past.tone(), Some(MarkTone::ConfirmedPast));

    let future = marks[&date("2024-06-20")];
    assert!(future.confirmed && !future.is_past);
    assert_eq!(future.tone(), Some(MarkTone::ConfirmedFuture));
}

#[test]
fn test_unconfirmed_tones() {
    let med = make_med("m1", "Daily", "2024-06-01", &["08:00"], &ALL_DAYS);
    let center = date("2024-06-15");
    let marks = marks_for_window(center, center, &[med], &[]);

    assert_eq!(marks[&date("2024-06-14")].tone(), Some(MarkTone::UnconfirmedPast));
    assert_eq!(marks[&date("2024-06-16")].tone(), Some(MarkTone::UnconfirmedFuture));
    let selected = marks[&center];
    assert!(selected.selected && selected.has_activity);
    assert_eq!(selected.tone(), Some(MarkTone::UnconfirmedFuture));
}

#[test]
fn test_logs_outside_window_are_ignored() {
    let center = date("2024-06-15");
    let far = center + TimeDelta::days(200);
    let log = make_log("l1", "gone", &format!("{far} 08:00"));
    let marks = marks_for_window(center, center, &[], &[log]);
    assert_eq!(marks.len(), 1);
}

#[test]
fn test_marks_are_pure() {
    let meds = vec![make_med("m1", "Daily", "2024-06-01", &["08:00"], &[Weekday::Wed])];
    let logs = vec![make_log("l1", "m1", "2024-06-12 08:00")];
    let a = marks_for_window(date("2024-06-15"), date("2024-06-13"), &meds, &logs);
    let b = marks_for_window(date("2024-06-15"), date("2024-06-13"), &meds, &logs);
    assert_eq!(a, b);
}
