use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::core::day;
use crate::models::adherence::AdherenceLog;
use crate::models::med::Medication;

pub const DAYS_BEFORE: i64 = 90;
pub const DAYS_AFTER: i64 = 89;

pub type Marks = BTreeMap<NaiveDate, MarkInfo>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MarkInfo {
    pub has_activity: bool,
    pub confirmed: bool,
    pub is_past: bool,
    pub selected: bool,
}

/// Presentation priority of a mark, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkTone {
    ConfirmedPast,
    ConfirmedFuture,
    UnconfirmedPast,
    UnconfirmedFuture,
}

impl MarkInfo {
    /// `None` for a date that is marked only because it is selected.
    pub fn tone(&self) -> Option<MarkTone> {
        if !self.has_activity && !self.confirmed {
            return None;
        }
        Some(match (self.confirmed, self.is_past) {
            (true, true) => MarkTone::ConfirmedPast,
            (true, false) => MarkTone::ConfirmedFuture,
            (false, true) => MarkTone::UnconfirmedPast,
            (false, false) => MarkTone::UnconfirmedFuture,
        })
    }
}

/// First and last date of the window around `center`. Both ends are
/// inclusive, so the window holds `DAYS_BEFORE + DAYS_AFTER + 1` dates: for a
/// center of 2024-06-15 it runs 2024-03-17 through 2024-09-12.
pub fn window(center: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = center
        .checked_sub_signed(TimeDelta::days(DAYS_BEFORE))
        .unwrap_or(NaiveDate::MIN);
    let end = center
        .checked_add_signed(TimeDelta::days(DAYS_AFTER))
        .unwrap_or(NaiveDate::MAX);
    (start, end)
}

/// Sparse per-date marks for the window around `center`.
///
/// A date is marked when the day resolver finds anything for it or a log is
/// attributed to it. `center` is always present with `selected` set. Pure in
/// its inputs.
pub fn marks_for_window(
    center: NaiveDate,
    today: NaiveDate,
    medications: &[Medication],
    logs: &[AdherenceLog],
) -> Marks {
    let confirmed_dates: HashSet<NaiveDate> =
        logs.iter().filter_map(AdherenceLog::effective_date).collect();
    let (start, end) = window(center);

    let mut marks = Marks::new();
    for date in start.iter_days().take_while(|d| *d <= end) {
        let has_activity = !day::doses_for_date(date, medications, logs).is_empty();
        let confirmed = confirmed_dates.contains(&date);
        let selected = date == center;
        if has_activity || confirmed || selected {
            marks.insert(
                date,
                MarkInfo {
                    has_activity,
                    confirmed,
                    is_past: date < today,
                    selected,
                },
            );
        }
    }
    tracing::debug!(%center, marked = marks.len(), "calendar marks computed");
    marks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_priority_order() {
        assert!(MarkTone::ConfirmedPast < MarkTone::ConfirmedFuture);
        assert!(MarkTone::ConfirmedFuture < MarkTone::UnconfirmedPast);
        assert!(MarkTone::UnconfirmedPast < MarkTone::UnconfirmedFuture);
    }

    #[test]
    fn tone_of_selection_only_mark_is_none() {
        let mark = MarkInfo {
            selected: true,
            ..MarkInfo::default()
        };
        assert_eq!(mark.tone(), None);
    }

    #[test]
    fn tone_combines_confirmation_and_time() {
        let mark = MarkInfo {
            has_activity: true,
            confirmed: false,
            is_past: true,
            selected: true,
        };
        assert_eq!(mark.tone(), Some(MarkTone::UnconfirmedPast));
    }
}
