//! Collaborator seams. The core only talks to the outside world through these
//! traits; `crate::db::Database` is the local implementation.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use serde_json::Value;

use crate::core::error::CoreResult;
use crate::models::adherence::{AdherenceLog, NewLog};

/// Medication and adherence-log records.
///
/// Read calls return the raw payload; `crate::core::ingest` turns it into
/// typed entities.
pub trait RecordStore {
    fn fetch_medications(&self) -> CoreResult<Value>;

    /// Logs whose effective date falls in `start..=end`.
    fn fetch_logs(&self, start: NaiveDate, end: NaiveDate) -> CoreResult<Value>;

    fn create_log(&self, log: &NewLog) -> CoreResult<AdherenceLog>;

    fn delete_log(&self, id: &str) -> CoreResult<()>;

    /// `{total, taken, missed, adherenceRate}`.
    fn fetch_stats(&self) -> CoreResult<Value>;
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn fetch_medications(&self) -> CoreResult<Value> {
        (**self).fetch_medications()
    }

    fn fetch_logs(&self, start: NaiveDate, end: NaiveDate) -> CoreResult<Value> {
        (**self).fetch_logs(start, end)
    }

    fn create_log(&self, log: &NewLog) -> CoreResult<AdherenceLog> {
        (**self).create_log(log)
    }

    fn delete_log(&self, id: &str) -> CoreResult<()> {
        (**self).delete_log(id)
    }

    fn fetch_stats(&self) -> CoreResult<Value> {
        (**self).fetch_stats()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ReminderHandle(pub String);

/// Fires a reminder for a medication at a local time of day.
pub trait ReminderScheduler {
    fn schedule_reminder(
        &self,
        medication_name: &str,
        fire_time: NaiveTime,
    ) -> CoreResult<ReminderHandle>;
}

/// Supplies the credential for store calls; `None` means signed out.
pub trait SessionProvider {
    fn credential(&self) -> Option<String>;
}

impl<T: SessionProvider + ?Sized> SessionProvider for &T {
    fn credential(&self) -> Option<String> {
        (**self).credential()
    }
}
