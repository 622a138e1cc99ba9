use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;
use serde_json::Value;

use crate::models::adherence::{AdherenceLog, LogStatus};

/// Width of the recent-adherence horizon, aligned with the calendar window.
pub const RECENT_WINDOW_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AdherenceSummary {
    pub total: u32,
    pub taken: u32,
    pub missed: u32,
    /// `taken / total`, or `0.0` when there are no logs. Always in `[0, 1]`.
    pub rate: f64,
}

impl AdherenceSummary {
    pub fn from_counts(total: u32, taken: u32, missed: u32) -> Self {
        let rate = if total == 0 {
            0.0
        } else {
            (f64::from(taken) / f64::from(total)).clamp(0.0, 1.0)
        };
        Self {
            total,
            taken,
            missed,
            rate,
        }
    }
}

pub fn summarize<'a>(logs: impl IntoIterator<Item = &'a AdherenceLog>) -> AdherenceSummary {
    let (mut total, mut taken, mut missed) = (0u32, 0u32, 0u32);
    for log in logs {
        total += 1;
        match log.status {
            LogStatus::Taken => taken += 1,
            LogStatus::Missed => missed += 1,
            LogStatus::Skipped | LogStatus::Pending => {}
        }
    }
    AdherenceSummary::from_counts(total, taken, missed)
}

/// Summary of logs whose effective date lies in `start..=end`.
pub fn summarize_window(logs: &[AdherenceLog], start: NaiveDate, end: NaiveDate) -> AdherenceSummary {
    summarize(
        logs.iter()
            .filter(|log| log.effective_date().is_some_and(|d| d >= start && d <= end)),
    )
}

pub fn last_90_days(logs: &[AdherenceLog], today: NaiveDate) -> AdherenceSummary {
    let start = today
        .checked_sub_signed(TimeDelta::days(RECENT_WINDOW_DAYS))
        .unwrap_or(NaiveDate::MIN);
    summarize_window(logs, start, today)
}

/// Read the store's `{total, taken, missed, adherenceRate}` payload.
///
/// Missing or malformed fields read as zero. A rate outside `[0, 1]` is
/// replaced by the one derived from the counts.
pub fn summary_from_stats(payload: &Value) -> AdherenceSummary {
    let body = match payload.get("data") {
        Some(inner) if inner.is_object() => inner,
        _ => payload,
    };
    let count = |key: &str| {
        body.get(key)
            .and_then(Value::as_u64)
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
            .unwrap_or(0)
    };
    let derived = AdherenceSummary::from_counts(count("total"), count("taken"), count("missed"));

    match body.get("adherenceRate").and_then(Value::as_f64) {
        Some(rate) if rate.is_finite() && (0.0..=1.0).contains(&rate) && derived.total > 0 => {
            AdherenceSummary { rate, ..derived }
        }
        _ => derived,
    }
}
