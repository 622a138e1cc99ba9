use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{OptionalExtension, params};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::models::adherence::NewLog;

use super::Database;

pub const TIMESTAMP_FMT: &str = "%Y-%m-%dT%H:%M:%S";

fn fmt_ts(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FMT).to_string()
}

struct LogRow {
    id: String,
    medication_id: String,
    medication_name: Option<String>,
    medication_dosage: Option<String>,
    status: String,
    scheduled_time: Option<String>,
    taken_at: Option<String>,
    created_at: String,
}

/// Wire shape of a log, with the medication embedded as an object the way a
/// populating API returns it.
fn row_to_json(r: LogRow) -> Value {
    json!({
        "id": r.id,
        "medicationId": {
            "id": r.medication_id,
            "name": r.medication_name,
            "dosage": r.medication_dosage,
        },
        "status": r.status,
        "scheduledTime": r.scheduled_time,
        "takenAt": r.taken_at,
        "createdAt": r.created_at,
    })
}

const SELECT_LOG: &str = "SELECT l.id, l.medication_id,
        COALESCE(m.name, l.medication_name), COALESCE(m.dosage, l.medication_dosage),
        l.status, l.scheduled_time, l.taken_at, l.created_at
     FROM adherence_logs l LEFT JOIN medications m ON m.id = l.medication_id";

macro_rules! map_row {
    ($row:expr) => {
        Ok(LogRow {
            id: $row.get(0)?,
            medication_id: $row.get(1)?,
            medication_name: $row.get(2)?,
            medication_dosage: $row.get(3)?,
            status: $row.get(4)?,
            scheduled_time: $row.get(5)?,
            taken_at: $row.get(6)?,
            created_at: $row.get(7)?,
        })
    };
}

impl Database {
    /// Insert a log, denormalizing the medication's name and dosage onto it so
    /// the log stays readable after the medication is deleted. Returns `None`
    /// when the medication does not exist.
    pub fn insert_log(&self, req: &NewLog, created_at: NaiveDateTime) -> Result<Option<String>> {
        let medication: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT name, dosage FROM medications WHERE id = ?1",
                params![req.medication_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        let Some((name, dosage)) = medication else {
            return Ok(None);
        };

        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO adherence_logs (id, medication_id, medication_name, medication_dosage, status, scheduled_time, taken_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id,
                req.medication_id,
                name,
                dosage,
                req.status.to_string(),
                fmt_ts(req.scheduled_time),
                req.taken_at.map(fmt_ts),
                fmt_ts(created_at),
            ],
        )?;
        Ok(Some(id))
    }

    pub fn log_row(&self, id: &str) -> Result<Option<Value>> {
        let sql = format!("{SELECT_LOG} WHERE l.id = ?1");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![id], |row| map_row!(row))?;
        match rows.next() {
            Some(row) => Ok(Some(row_to_json(row?))),
            None => Ok(None),
        }
    }

    /// Logs whose effective date (`taken_at`, else `scheduled_time`, else
    /// `created_at`) lies in `start..=end`.
    pub fn query_logs(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Value>> {
        let sql = format!(
            "{SELECT_LOG}
             WHERE substr(COALESCE(l.taken_at, l.scheduled_time, l.created_at), 1, 10) BETWEEN ?1 AND ?2
             ORDER BY COALESCE(l.taken_at, l.scheduled_time, l.created_at)"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![start.to_string(), end.to_string()], |row| {
            map_row!(row)
        })?;

        let mut logs = Vec::new();
        for row in rows {
            logs.push(row_to_json(row?));
        }
        Ok(logs)
    }

    pub fn remove_log(&self, id: &str) -> Result<bool> {
        let count = self
            .conn
            .execute("DELETE FROM adherence_logs WHERE id = ?1", params![id])?;
        Ok(count > 0)
    }

    /// `(total, taken, missed)` over every log.
    pub fn log_counts(&self) -> Result<(u32, u32, u32)> {
        let counts = self.conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(status = 'taken'), 0),
                    COALESCE(SUM(status = 'missed'), 0)
             FROM adherence_logs",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        Ok(counts)
    }
}
