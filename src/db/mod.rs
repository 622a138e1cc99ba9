pub mod logs;
mod meds;
mod migrate;
pub mod reminders;

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveTime};
use rusqlite::Connection;
use serde_json::{Value, json};
use std::path::Path;

use crate::core::error::{CoreError, CoreResult};
use crate::core::ingest;
use crate::core::store::{RecordStore, ReminderHandle, ReminderScheduler};
use crate::models::adherence::{AdherenceLog, NewLog};

pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        #[cfg(unix)]
        {
            use std::fs::{self, OpenOptions};
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            if !path.exists() {
                OpenOptions::new()
                    .write(true)
                    .create(true)
                    .mode(0o600)
                    .open(path)?;
            } else {
                let mut perms = fs::metadata(path)?.permissions();
                if perms.mode() & 0o777 != 0o600 {
                    perms.set_mode(0o600);
                    fs::set_permissions(path, perms)?;
                }
            }
        }

        let conn = Connection::open(path)?;
        let db = Self { conn };
        migrate::run(&db.conn)?;
        Ok(db)
    }
}

fn encode<T: serde::Serialize>(value: T) -> CoreResult<Value> {
    serde_json::to_value(value).map_err(|e| CoreError::Transport(e.to_string()))
}

impl RecordStore for Database {
    fn fetch_medications(&self) -> CoreResult<Value> {
        encode(self.list_medications(None)?)
    }

    fn fetch_logs(&self, start: NaiveDate, end: NaiveDate) -> CoreResult<Value> {
        Ok(Value::Array(self.query_logs(start, end)?))
    }

    fn create_log(&self, log: &NewLog) -> CoreResult<AdherenceLog> {
        let created_at = Local::now().naive_local();
        let id = self
            .insert_log(log, created_at)?
            .ok_or_else(|| CoreError::NotFound(format!("medication '{}'", log.medication_id)))?;
        let row = self
            .log_row(&id)?
            .ok_or_else(|| CoreError::NotFound(format!("log '{id}'")))?;
        ingest::logs_from_payload(row)
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::Transport(format!("log '{id}' could not be read back")))
    }

    fn delete_log(&self, id: &str) -> CoreResult<()> {
        if self.remove_log(id)? {
            Ok(())
        } else {
            Err(CoreError::NotFound(format!("log '{id}'")))
        }
    }

    fn fetch_stats(&self) -> CoreResult<Value> {
        let (total, taken, missed) = self.log_counts()?;
        let rate = if total == 0 {
            0.0
        } else {
            f64::from(taken) / f64::from(total)
        };
        Ok(json!({
            "total": total,
            "taken": taken,
            "missed": missed,
            "adherenceRate": rate,
        }))
    }
}

impl ReminderScheduler for Database {
    fn schedule_reminder(
        &self,
        medication_name: &str,
        fire_time: NaiveTime,
    ) -> CoreResult<ReminderHandle> {
        Ok(ReminderHandle(self.insert_reminder(medication_name, fire_time)?))
    }
}
