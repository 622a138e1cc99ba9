use anyhow::Result;
use chrono::{Local, NaiveTime};
use rusqlite::params;
use serde::Serialize;
use uuid::Uuid;

use super::Database;
use super::logs::TIMESTAMP_FMT;

#[derive(Debug, Clone, Serialize)]
pub struct StoredReminder {
    pub id: String,
    pub medication_name: String,
    pub fire_time: String,
    pub created_at: String,
}

impl Database {
    pub fn insert_reminder(&self, medication_name: &str, fire_time: NaiveTime) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.conn.execute(
            "INSERT INTO reminders (id, medication_name, fire_time, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                id,
                medication_name,
                fire_time.format("%H:%M").to_string(),
                Local::now().naive_local().format(TIMESTAMP_FMT).to_string(),
            ],
        )?;
        Ok(id)
    }

    pub fn list_reminders(&self) -> Result<Vec<StoredReminder>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, medication_name, fire_time, created_at
             FROM reminders ORDER BY fire_time, medication_name",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StoredReminder {
                id: row.get(0)?,
                medication_name: row.get(1)?,
                fire_time: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;

        let mut reminders = Vec::new();
        for row in rows {
            reminders.push(row?);
        }
        Ok(reminders)
    }
}
