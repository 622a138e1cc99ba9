use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::core::store::{ReminderHandle, ReminderScheduler};
use crate::models::med::Medication;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledReminder {
    pub medication: String,
    pub fire_time: NaiveTime,
    pub handle: ReminderHandle,
}

#[derive(Debug, Default, Serialize)]
pub struct ReminderReport {
    pub scheduled: Vec<ScheduledReminder>,
    pub failed: usize,
}

/// Schedule one reminder per schedule entry of every medication that has not
/// ended by `today`.
///
/// Meant to run whenever the medication list changes. Earlier reminders are
/// not cancelled or deduplicated. A failing entry is counted and skipped.
pub fn schedule_all<R: ReminderScheduler + ?Sized>(
    scheduler: &R,
    medications: &[Medication],
    today: NaiveDate,
) -> ReminderReport {
    let mut report = ReminderReport::default();
    for med in medications.iter().filter(|m| !m.is_ended_on(today)) {
        for entry in &med.schedule {
            match scheduler.schedule_reminder(&med.name, entry.time) {
                Ok(handle) => report.scheduled.push(ScheduledReminder {
                    medication: med.name.clone(),
                    fire_time: entry.time,
                    handle,
                }),
                Err(e) => {
                    tracing::warn!(medication = %med.name, "scheduling reminder failed: {e}");
                    report.failed += 1;
                }
            }
        }
    }
    report
}
