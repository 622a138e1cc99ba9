mod common;

use chrono::TimeDelta;
use common::{date, make_med, ts};
use doseline::core::next_dose::{UPCOMING_LIMIT, next_dose, upcoming_doses};
use doseline::models::med::{Frequency, Medication};

fn med_with(freq: &str, start: &str) -> Medication {
    let mut med = make_med("m1", "Metformin", start, &[], &[]);
    med.frequency = Frequency::from(freq.to_string());
    med
}

#[test]
fn test_twice_daily_adds_twelve_hours() {
    let now = ts("2024-06-15 08:00");
    let med = med_with("twice-daily", "2024-06-01");
    assert_eq!(next_dose(&med, now), Some(ts("2024-06-15 20:00")));
}

#[test]
fn test_once_daily_adds_one_day() {
    let now = ts("2024-06-15 08:00");
    let med = med_with("Once daily", "2024-06-01");
    assert_eq!(next_dose(&med, now), Some(ts("2024-06-16 08:00")));
}

#[test]
fn test_every_six_hours() {
    let now = ts("2024-06-15 08:00");
    let med = med_with("every 6 hours", "2024-06-01");
    assert_eq!(next_dose(&med, now), Some(ts("2024-06-15 14:00")));
}

#[test]
fn test_every_without_digits_falls_back_to_one_day() {
    let now = ts("2024-06-15 08:00");
    let med = med_with("every banana", "2024-06-01");
    assert_eq!(next_dose(&med, now), Some(now + TimeDelta::days(1)));
}

#[test]
fn test_weekly_and_as_needed_fall_back_to_one_day() {
    let now = ts("2024-06-15 08:00");
    for freq in ["weekly", "as needed", "custom", "whenever"] {
        let med = med_with(freq, "2024-06-01");
        assert_eq!(next_dose(&med, now), Some(ts("2024-06-16 08:00")), "{freq}");
    }
}

#[test]
fn test_before_start_returns_start_at_midnight() {
    let now = ts("2024-06-15 08:00");
    let med = med_with("every 6 hours", "2024-06-20");
    assert_eq!(next_dose(&med, now), Some(ts("2024-06-20 00:00")));
}

#[test]
fn test_missing_start_date_has_no_next_dose() {
    let mut med = med_with("twice-daily", "2024-06-01");
    med.start_date = None;
    assert_eq!(next_dose(&med, ts("2024-06-15 08:00")), None);
}

#[test]
fn test_overflow_yields_none() {
    let med = med_with("twice-daily", "2024-06-01");
    let end_of_time = chrono::NaiveDateTime::MAX;
    assert_eq!(next_dose(&med, end_of_time), None);
}

#[test]
fn test_upcoming_sorted_and_truncated() {
    let now = ts("2024-06-15 08:00");
    let mut meds = Vec::new();
    for (i, hours) in [8, 2, 6, 4, 10, 12, 3].iter().enumerate() {
        let mut med = med_with(&format!("every {hours} hours"), "2024-06-01");
        med.id = format!("m{i}");
        med.name = format!("Med {i}");
        meds.push(med);
    }

    let upcoming = upcoming_doses(&meds, now, UPCOMING_LIMIT);
    assert_eq!(upcoming.len(), 5);
    let due: Vec<_> = upcoming.iter().map(|u| u.due_at).collect();
    assert_eq!(
        due,
        vec![
            ts("2024-06-15 10:00"),
            ts("2024-06-15 11:00"),
            ts("2024-06-15 12:00"),
            ts("2024-06-15 14:00"),
            ts("2024-06-15 16:00"),
        ]
    );
}

#[test]
fn test_upcoming_ties_break_by_name() {
    let now = ts("2024-06-15 08:00");
    let mut b = med_with("twice-daily", "2024-06-01");
    b.id = "b".into();
    b.name = "Bravo".into();
    let mut a = med_with("twice-daily", "2024-06-01");
    a.id = "a".into();
    a.name = "Alpha".into();

    let upcoming = upcoming_doses(&[b, a], now, 5);
    let names: Vec<_> = upcoming.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "Bravo"]);
}

#[test]
fn test_upcoming_skips_unknown_start_and_ended() {
    let now = ts("2024-06-15 08:00");
    let mut no_start = med_with("twice-daily", "2024-06-01");
    no_start.start_date = None;
    let mut ended = med_with("twice-daily", "2024-06-01");
    ended.id = "ended".into();
    ended.end_date = Some(date("2024-06-14"));
    let mut ends_today = med_with("twice-daily", "2024-06-01");
    ends_today.id = "today".into();
    ends_today.end_date = Some(date("2024-06-15"));

    let upcoming = upcoming_doses(&[no_start, ended, ends_today], now, 5);
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].medication_id, "today");
}

#[test]
fn test_upcoming_future_start_is_included() {
    let now = ts("2024-06-15 08:00");
    let med = med_with("once-daily", "2024-07-01");
    let upcoming = upcoming_doses(&[med], now, 5);
    assert_eq!(upcoming[0].due_at, ts("2024-07-01 00:00"));
}
