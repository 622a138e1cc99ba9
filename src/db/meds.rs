use anyhow::Result;
use chrono::{Local, NaiveDate};
use rusqlite::params;

use crate::models::med::{Frequency, Medication, ScheduleEntry};

use super::Database;

const DATE_FMT: &str = "%Y-%m-%d";

struct MedicationRow {
    id: String,
    name: String,
    dosage: String,
    frequency: String,
    start_date: Option<String>,
    end_date: Option<String>,
    schedule: Option<String>,
    instructions: String,
}

fn parse_date(s: Option<&str>) -> Result<Option<NaiveDate>> {
    Ok(match s {
        Some(s) => Some(NaiveDate::parse_from_str(s, DATE_FMT)?),
        None => None,
    })
}

fn row_to_medication(r: MedicationRow) -> Result<Medication> {
    let schedule: Vec<ScheduleEntry> = match r.schedule {
        Some(ref s) => serde_json::from_str(s)?,
        None => Vec::new(),
    };
    Ok(Medication {
        id: r.id,
        name: r.name,
        dosage: r.dosage,
        frequency: Frequency::from(r.frequency),
        start_date: parse_date(r.start_date.as_deref())?,
        end_date: parse_date(r.end_date.as_deref())?,
        schedule,
        instructions: r.instructions,
    })
}

const SELECT_COLS: &str =
    "id, name, dosage, frequency, start_date, end_date, schedule, instructions";

macro_rules! map_row {
    ($row:expr) => {
        Ok(MedicationRow {
            id: $row.get(0)?,
            name: $row.get(1)?,
            dosage: $row.get(2)?,
            frequency: $row.get(3)?,
            start_date: $row.get(4)?,
            end_date: $row.get(5)?,
            schedule: $row.get(6)?,
            instructions: $row.get(7)?,
        })
    };
}

impl Database {
    pub fn insert_medication(&self, med: &Medication) -> Result<()> {
        self.conn.execute(
            "INSERT INTO medications (id, name, dosage, frequency, start_date, end_date, schedule, instructions, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                med.id,
                med.name,
                med.dosage,
                med.frequency.to_string(),
                med.start_date.map(|d| d.format(DATE_FMT).to_string()),
                med.end_date.map(|d| d.format(DATE_FMT).to_string()),
                serde_json::to_string(&med.schedule)?,
                med.instructions,
                Local::now().naive_local().format(super::logs::TIMESTAMP_FMT).to_string(),
            ],
        )?;
        Ok(())
    }

    /// Look up a medication by id, or by case-insensitive name. A still-running
    /// medication wins over an ended one with the same name.
    pub fn get_medication(&self, key: &str) -> Result<Option<Medication>> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM medications
             WHERE id = ?1 OR lower(name) = lower(?1)
             ORDER BY (id = ?1) DESC, (end_date IS NULL) DESC, created_at DESC
             LIMIT 1"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![key], |row| map_row!(row))?;
        match rows.next() {
            Some(row) => Ok(Some(row_to_medication(row?)?)),
            None => Ok(None),
        }
    }

    /// All medications, or only those not ended before `active_on`.
    pub fn list_medications(&self, active_on: Option<NaiveDate>) -> Result<Vec<Medication>> {
        let mut meds = Vec::new();
        match active_on {
            Some(date) => {
                let sql = format!(
                    "SELECT {SELECT_COLS} FROM medications
                     WHERE end_date IS NULL OR end_date >= ?1
                     ORDER BY name ASC"
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map(params![date.format(DATE_FMT).to_string()], |row| {
                    map_row!(row)
                })?;
                for row in rows {
                    meds.push(row_to_medication(row?)?);
                }
            }
            None => {
                let sql = format!("SELECT {SELECT_COLS} FROM medications ORDER BY name ASC");
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map([], |row| map_row!(row))?;
                for row in rows {
                    meds.push(row_to_medication(row?)?);
                }
            }
        }
        Ok(meds)
    }

    pub fn end_medication(&self, id: &str, end_date: NaiveDate) -> Result<bool> {
        let count = self.conn.execute(
            "UPDATE medications SET end_date = ?1 WHERE id = ?2",
            params![end_date.format(DATE_FMT).to_string(), id],
        )?;
        Ok(count > 0)
    }

    /// Delete a medication. Its adherence logs are kept.
    pub fn remove_medication(&self, id: &str) -> Result<bool> {
        let count = self
            .conn
            .execute("DELETE FROM medications WHERE id = ?1", params![id])?;
        Ok(count > 0)
    }
}
