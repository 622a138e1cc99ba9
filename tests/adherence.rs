mod common;

use common::{date, make_log};
use doseline::core::adherence::{last_90_days, summarize, summarize_window, summary_from_stats};
use doseline::models::adherence::{AdherenceLog, LogStatus};
use serde_json::json;

fn with_status(id: &str, at: &str, status: LogStatus) -> AdherenceLog {
    let mut log = make_log(id, "m1", at);
    log.status = status;
    log
}

#[test]
fn test_empty_rate_is_zero() {
    let none: Vec<AdherenceLog> = Vec::new();
    let s = summarize(&none);
    assert_eq!((s.total, s.taken, s.missed), (0, 0, 0));
    assert_eq!(s.rate, 0.0);
}

#[test]
fn test_rate_counts_taken_over_total() {
    let logs = vec![
        with_status("1", "2024-06-10 08:00", LogStatus::Taken),
        with_status("2", "2024-06-11 08:00", LogStatus::Taken),
        with_status("3", "2024-06-12 08:00", LogStatus::Missed),
        with_status("4", "2024-06-13 08:00", LogStatus::Skipped),
    ];
    let s = summarize(&logs);
    assert_eq!(s.total, 4);
    assert_eq!(s.taken, 2);
    assert_eq!(s.missed, 1);
    assert!((s.rate - 0.5).abs() < 1e-9);
}

#[test]
fn test_rate_always_within_unit_interval() {
    let statuses = [LogStatus::Taken, LogStatus::Missed, LogStatus::Skipped, LogStatus::Pending];
    for n in 0..12 {
        let logs: Vec<_> = (0..n)
            .map(|i| with_status(&i.to_string(), "2024-06-10 08:00", statuses[i % 4]))
            .collect();
        let s = summarize(&logs);
        assert!((0.0..=1.0).contains(&s.rate), "rate {} for {n} logs", s.rate);
    }
}

#[test]
fn test_window_is_inclusive() {
    let logs = vec![
        with_status("1", "2024-06-01 08:00", LogStatus::Taken),
        with_status("2", "2024-06-15 23:59", LogStatus::Taken),
        with_status("3", "2024-06-16 00:00", LogStatus::Taken),
    ];
    let s = summarize_window(&logs, date("2024-06-01"), date("2024-06-15"));
    assert_eq!(s.total, 2);
}

#[test]
fn test_last_90_days_drops_older_logs() {
    let logs = vec![
        with_status("old", "2024-03-16 08:00", LogStatus::Missed),
        with_status("edge", "2024-03-17 08:00", LogStatus::Taken),
        with_status("new", "2024-06-15 08:00", LogStatus::Taken),
    ];
    let s = last_90_days(&logs, date("2024-06-15"));
    assert_eq!(s.total, 2);
    assert_eq!(s.taken, 2);
    assert_eq!(s.rate, 1.0);
}

#[test]
fn test_stats_out_of_range_rate_is_recomputed() {
    let s = summary_from_stats(&json!({"total": 4, "taken": 2, "missed": 2, "adherenceRate": 7.5}));
    assert!((s.rate - 0.5).abs() < 1e-9);
}
