use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::adherence::AdherenceLog;
use crate::models::med::{Medication, ScheduleEntry};

/// Display name for a log whose medication carries no name at all.
pub const UNKNOWN_MEDICATION: &str = "Unknown medication";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DoseKind {
    /// Comes from a schedule entry for the day; may be confirmed by a log.
    Scheduled,
    /// A log with no schedule entry at its time.
    Unscheduled,
}

/// One (medication, date, time-of-day) unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoseInstance {
    pub kind: DoseKind,
    pub time: Option<NaiveTime>,
    /// Whether a "log dose" action is offered for this row.
    pub can_log: bool,
    pub log: Option<AdherenceLog>,
}

/// Everything shown for one medication on one date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayEntry {
    pub medication: Medication,
    /// The medication could not be resolved; `medication` is a placeholder
    /// built from the log.
    pub orphaned: bool,
    pub ended: bool,
    pub doses: Vec<DoseInstance>,
}

/// Logs attributed to `date`, grouped by medication key.
fn bucket_logs(date: NaiveDate, logs: &[AdherenceLog]) -> BTreeMap<&str, Vec<&AdherenceLog>> {
    let mut buckets: BTreeMap<&str, Vec<&AdherenceLog>> = BTreeMap::new();
    for log in logs {
        if log.effective_date() == Some(date) {
            buckets.entry(log.medication.key()).or_default().push(log);
        }
    }
    buckets
}

fn matches_entry(log: &AdherenceLog, entry: &ScheduleEntry) -> bool {
    let label = entry.time_label();
    log.reported_time_label()
        .is_some_and(|reported| reported.contains(&label))
}

fn dose_rows(scheduled: &[&ScheduleEntry], logged: &[&AdherenceLog], can_log: bool) -> Vec<DoseInstance> {
    let mut entries = scheduled.to_vec();
    entries.sort_by_key(|e| e.time);

    let mut rows: Vec<DoseInstance> = entries
        .iter()
        .map(|entry| DoseInstance {
            kind: DoseKind::Scheduled,
            time: Some(entry.time),
            can_log,
            log: logged
                .iter()
                .find(|log| matches_entry(log, entry))
                .map(|log| (*log).clone()),
        })
        .collect();

    let mut extra: Vec<DoseInstance> = logged
        .iter()
        .filter(|log| !entries.iter().any(|entry| matches_entry(log, entry)))
        .map(|log| DoseInstance {
            kind: DoseKind::Unscheduled,
            time: log.reported_time(),
            can_log: false,
            log: Some((*log).clone()),
        })
        .collect();
    extra.sort_by_key(|row| row.time);

    rows.extend(extra);
    rows
}

fn orphan_entry(id: &str, logged: &[&AdherenceLog]) -> DayEntry {
    let name = logged
        .iter()
        .find_map(|log| log.medication.name.clone())
        .unwrap_or_else(|| UNKNOWN_MEDICATION.to_string());
    let dosage = logged
        .iter()
        .find_map(|log| log.medication.dosage.clone())
        .unwrap_or_default();

    DayEntry {
        medication: Medication::placeholder(id, name, dosage),
        orphaned: true,
        ended: false,
        doses: dose_rows(&[], logged, false),
    }
}

/// Merge each medication's recurring schedule with the logs recorded for
/// `date`.
///
/// A medication appears when it has a schedule entry for the weekday or a log
/// on the date, unless it starts after `date`. Ended medications still appear
/// (flagged) so history stays visible, but offer no logging. Logs whose
/// medication is unknown produce placeholder entries after the known ones.
pub fn doses_for_date(
    date: NaiveDate,
    medications: &[Medication],
    logs: &[AdherenceLog],
) -> Vec<DayEntry> {
    let day = date.weekday();
    let mut buckets = bucket_logs(date, logs);
    let mut entries = Vec::new();

    for med in medications {
        let logged = buckets.remove(med.id.trim()).unwrap_or_default();
        if !med.has_started_by(date) {
            continue;
        }
        let scheduled: Vec<&ScheduleEntry> = med.entries_on(day).collect();
        if scheduled.is_empty() && logged.is_empty() {
            continue;
        }
        entries.push(DayEntry {
            medication: med.clone(),
            orphaned: false,
            ended: med.is_ended_on(date),
            doses: dose_rows(&scheduled, &logged, med.is_active_on(date)),
        });
    }

    for (id, logged) in &buckets {
        entries.push(orphan_entry(id, logged));
    }

    entries
}
