#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde_json::{Value, json};
use std::cell::{Cell, RefCell};
use tempfile::TempDir;

use doseline::core::error::{CoreError, CoreResult};
use doseline::core::store::{RecordStore, ReminderHandle, ReminderScheduler, SessionProvider};
use doseline::db::Database;
use doseline::models::adherence::{AdherenceLog, LogStatus, MedicationRef, NewLog};
use doseline::models::med::{Frequency, Medication, ScheduleEntry};

/// Create a temporary database for testing.
pub fn setup_db() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("test.db");
    let db = Database::open(&db_path).unwrap();
    (dir, db)
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap()
}

pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

/// A medication with a fixed id and one entry per `times`, all on `days`.
pub fn make_med(id: &str, name: &str, start: &str, times: &[&str], days: &[Weekday]) -> Medication {
    let mut med = Medication::new(name, Frequency::OnceDaily, date(start));
    med.id = id.to_string();
    med.dosage = "10mg".to_string();
    med.schedule = times
        .iter()
        .map(|t| ScheduleEntry::new(time(t), days.iter().copied()))
        .collect();
    med
}

/// A taken log whose scheduled and taken times are both `at`.
pub fn make_log(id: &str, medication_id: &str, at: &str) -> AdherenceLog {
    AdherenceLog {
        id: id.to_string(),
        medication: MedicationRef::new(medication_id),
        status: LogStatus::Taken,
        scheduled_time: Some(ts(at)),
        taken_at: Some(ts(at)),
        created_at: Some(ts(at)),
    }
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// In-memory record store with switchable failures and call counters.
#[derive(Default)]
pub struct FakeStore {
    pub medications: RefCell<Vec<Medication>>,
    pub logs: RefCell<Vec<AdherenceLog>>,
    pub next_id: Cell<u32>,
    pub fail_medications: Cell<bool>,
    pub fail_logs: Cell<bool>,
    pub fail_stats: Cell<bool>,
    pub fail_create: Cell<bool>,
    pub fail_delete: Cell<bool>,
    pub create_calls: Cell<u32>,
    pub delete_calls: Cell<u32>,
}

fn transport(what: &str) -> CoreError {
    CoreError::Transport(format!("{what} unavailable"))
}

impl FakeStore {
    pub fn with_medications(meds: Vec<Medication>) -> Self {
        Self {
            medications: RefCell::new(meds),
            ..Self::default()
        }
    }
}

impl RecordStore for FakeStore {
    fn fetch_medications(&self) -> CoreResult<Value> {
        if self.fail_medications.get() {
            return Err(transport("medications"));
        }
        Ok(json!({ "data": serde_json::to_value(&*self.medications.borrow()).unwrap() }))
    }

    fn fetch_logs(&self, start: NaiveDate, end: NaiveDate) -> CoreResult<Value> {
        if self.fail_logs.get() {
            return Err(transport("logs"));
        }
        let logs: Vec<AdherenceLog> = self
            .logs
            .borrow()
            .iter()
            .filter(|l| l.effective_date().is_some_and(|d| d >= start && d <= end))
            .cloned()
            .collect();
        Ok(json!({ "logs": serde_json::to_value(logs).unwrap() }))
    }

    fn create_log(&self, log: &NewLog) -> CoreResult<AdherenceLog> {
        self.create_calls.set(self.create_calls.get() + 1);
        if self.fail_create.get() {
            return Err(transport("create"));
        }
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        let created = AdherenceLog {
            id: format!("log-{n}"),
            medication: MedicationRef::new(log.medication_id.clone()),
            status: log.status,
            scheduled_time: Some(log.scheduled_time),
            taken_at: log.taken_at,
            created_at: log.taken_at,
        };
        self.logs.borrow_mut().push(created.clone());
        Ok(created)
    }

    fn delete_log(&self, id: &str) -> CoreResult<()> {
        self.delete_calls.set(self.delete_calls.get() + 1);
        if self.fail_delete.get() {
            return Err(transport("delete"));
        }
        let mut logs = self.logs.borrow_mut();
        let before = logs.len();
        logs.retain(|l| l.id != id);
        if logs.len() == before {
            return Err(CoreError::NotFound(format!("log '{id}'")));
        }
        Ok(())
    }

    fn fetch_stats(&self) -> CoreResult<Value> {
        if self.fail_stats.get() {
            return Err(transport("stats"));
        }
        let logs = self.logs.borrow();
        let total = logs.len();
        let taken = logs.iter().filter(|l| l.status == LogStatus::Taken).count();
        let missed = logs.iter().filter(|l| l.status == LogStatus::Missed).count();
        let rate = if total == 0 { 0.0 } else { taken as f64 / total as f64 };
        Ok(json!({
            "total": total,
            "taken": taken,
            "missed": missed,
            "adherenceRate": rate,
        }))
    }
}

pub struct FakeSession(pub Option<String>);

impl FakeSession {
    pub fn signed_in() -> Self {
        Self(Some("token".to_string()))
    }

    pub fn signed_out() -> Self {
        Self(None)
    }
}

impl SessionProvider for FakeSession {
    fn credential(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Records every reminder; names listed in `fail_for` are rejected.
#[derive(Default)]
pub struct FakeScheduler {
    pub calls: RefCell<Vec<(String, NaiveTime)>>,
    pub fail_for: Vec<String>,
}

impl ReminderScheduler for FakeScheduler {
    fn schedule_reminder(&self, medication_name: &str, fire_time: NaiveTime) -> CoreResult<ReminderHandle> {
        if self.fail_for.iter().any(|n| n == medication_name) {
            return Err(transport("scheduler"));
        }
        let mut calls = self.calls.borrow_mut();
        calls.push((medication_name.to_string(), fire_time));
        Ok(ReminderHandle(format!("r-{}", calls.len())))
    }
}
