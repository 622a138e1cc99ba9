//! Normalization of raw record-store payloads into typed entities.
//!
//! Stores wrap lists inconsistently (`{data: [...]}`, `{items: [...]}`,
//! `{logs: [...]}`, a single bare record, a bare array) and embed the
//! medication reference on a log either as a plain id or as an object. All of
//! that is resolved here, once. Anything unrecognizable becomes an empty list
//! or a skipped record, never an error.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

use crate::models::adherence::{AdherenceLog, LogStatus, MedicationRef};
use crate::models::med::{Frequency, Medication, ScheduleEntry, parse_time_of_day, parse_weekday};

const WRAPPER_KEYS: [&str; 3] = ["data", "items", "logs"];

/// Unwrap a payload into its list of records.
pub fn records(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            for key in WRAPPER_KEYS {
                if matches!(map.get(key), Some(Value::Array(_)))
                    && let Some(Value::Array(items)) = map.remove(key)
                {
                    return items;
                }
            }
            if map.contains_key("id") || map.contains_key("_id") {
                vec![Value::Object(map)]
            } else {
                Vec::new()
            }
        }
        _ => Vec::new(),
    }
}

/// Stringify an id that may arrive as a string, a number or an object
/// carrying `_id` / `id`.
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("_id").or_else(|| map.get("id")).and_then(id_string),
        _ => None,
    }
}

/// Calendar date written at the start of the string. Offsets are ignored so a
/// date never shifts by a day.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let head = s.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Local wall-clock timestamp. RFC 3339 values with an offset are converted
/// to local time; naive values are taken as already local.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

// ---------------------------------------------------------------------------
// Medications
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MedicationRecord {
    #[serde(alias = "_id")]
    id: Value,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    dosage: Option<String>,
    #[serde(default)]
    frequency: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    schedule: Option<Vec<Value>>,
    #[serde(default)]
    instructions: Option<String>,
}

fn schedule_entry(value: &Value) -> Option<ScheduleEntry> {
    let time = parse_time_of_day(value.get("time")?.as_str()?)?;
    let days = value
        .get("days")
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .filter_map(parse_weekday)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    Some(ScheduleEntry::new(time, days))
}

fn medication(value: Value) -> Option<Medication> {
    let record: MedicationRecord = match serde_json::from_value(value) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("skipping malformed medication record: {e}");
            return None;
        }
    };
    let Some(id) = id_string(&record.id) else {
        tracing::warn!("skipping medication record without an id");
        return None;
    };

    let schedule = record
        .schedule
        .unwrap_or_default()
        .iter()
        .filter_map(|raw| {
            let entry = schedule_entry(raw);
            if entry.is_none() {
                tracing::warn!(medication = %id, "dropping unreadable schedule entry");
            }
            entry
        })
        .collect();

    Some(Medication {
        name: record.name.unwrap_or_default(),
        dosage: record.dosage.unwrap_or_default(),
        frequency: Frequency::from(record.frequency.unwrap_or_default()),
        start_date: record.start_date.as_deref().and_then(parse_date),
        end_date: record.end_date.as_deref().and_then(parse_date),
        schedule,
        instructions: record.instructions.unwrap_or_default(),
        id,
    })
}

pub fn medications_from_payload(payload: Value) -> Vec<Medication> {
    records(payload).into_iter().filter_map(medication).collect()
}

// ---------------------------------------------------------------------------
// Adherence logs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogRecord {
    #[serde(alias = "_id")]
    id: Value,
    #[serde(default, alias = "medication")]
    medication_id: Value,
    #[serde(default)]
    medication_name: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    scheduled_time: Option<String>,
    #[serde(default)]
    taken_at: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

/// Resolve the polymorphic medication field of a log.
pub fn medication_ref(value: &Value) -> Option<MedicationRef> {
    let id = id_string(value)?;
    let field = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };
    Some(MedicationRef {
        id,
        name: field("name"),
        dosage: field("dosage"),
    })
}

fn log(value: Value) -> Option<AdherenceLog> {
    let record: LogRecord = match serde_json::from_value(value) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("skipping malformed adherence log: {e}");
            return None;
        }
    };
    let id = id_string(&record.id)?;
    let Some(mut medication) = medication_ref(&record.medication_id) else {
        tracing::warn!(log = %id, "skipping adherence log without a medication reference");
        return None;
    };
    if medication.name.is_none() {
        medication.name = record.medication_name.filter(|n| !n.is_empty());
    }
    let status = match record.status.as_deref() {
        None => LogStatus::Pending,
        Some(raw) => match raw.parse() {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(log = %id, "skipping adherence log: {e}");
                return None;
            }
        },
    };

    Some(AdherenceLog {
        id,
        medication,
        status,
        scheduled_time: record.scheduled_time.as_deref().and_then(parse_timestamp),
        taken_at: record.taken_at.as_deref().and_then(parse_timestamp),
        created_at: record.created_at.as_deref().and_then(parse_timestamp),
    })
}

pub fn logs_from_payload(payload: Value) -> Vec<AdherenceLog> {
    records(payload).into_iter().filter_map(log).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use serde_json::json;

    fn med_json(id: &str) -> Value {
        json!({"_id": id, "name": "Metformin", "frequency": "twice-daily", "startDate": "2024-06-01"})
    }

    #[test]
    fn records_accepts_every_wrapper_shape() {
        for payload in [
            json!([med_json("a")]),
            json!({"data": [med_json("a")]}),
            json!({"items": [med_json("a")]}),
            json!({"logs": [med_json("a")]}),
            med_json("a"),
        ] {
            assert_eq!(records(payload).len(), 1);
        }
    }

    #[test]
    fn records_defaults_to_empty() {
        assert!(records(json!(null)).is_empty());
        assert!(records(json!("oops")).is_empty());
        assert!(records(json!({"data": "not a list"})).is_empty());
        assert!(records(json!({"message": "server error"})).is_empty());
    }

    #[test]
    fn id_string_handles_all_shapes() {
        assert_eq!(id_string(&json!("m1")).as_deref(), Some("m1"));
        assert_eq!(id_string(&json!(42)).as_deref(), Some("42"));
        assert_eq!(id_string(&json!({"_id": "m1"})).as_deref(), Some("m1"));
        assert_eq!(id_string(&json!({"id": 7})).as_deref(), Some("7"));
        assert_eq!(id_string(&json!("  ")), None);
        assert_eq!(id_string(&json!(null)), None);
    }

    #[test]
    fn parse_date_ignores_offset() {
        let d = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(parse_date("2024-06-15"), Some(d));
        assert_eq!(parse_date("2024-06-15T00:00:00.000Z"), Some(d));
        assert_eq!(parse_date("15/06/2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn parse_timestamp_naive_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-06-15T08:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-15T08:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-06-15 08:00"), Some(expected));
        assert_eq!(parse_timestamp("soon"), None);
    }

    #[test]
    fn medication_schedule_is_normalized() {
        let meds = medications_from_payload(json!({"data": [{
            "_id": "m1",
            "name": "Metformin",
            "dosage": "500mg",
            "frequency": "Twice Daily",
            "startDate": "2024-06-01T00:00:00.000Z",
            "schedule": [
                {"time": "08:00", "days": ["Monday", "wed", "Blursday"]},
                {"time": "bad", "days": ["Monday"]},
                {"time": "20:00"}
            ]
        }]}));
        assert_eq!(meds.len(), 1);
        let m = &meds[0];
        assert_eq!(m.id, "m1");
        assert_eq!(m.frequency, Frequency::TwiceDaily);
        assert_eq!(m.start_date, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(m.schedule.len(), 2);
        assert_eq!(m.schedule[0].days, vec![Weekday::Mon, Weekday::Wed]);
        assert!(m.schedule[1].days.is_empty());
    }

    #[test]
    fn medication_with_bad_start_date_keeps_none() {
        let meds = medications_from_payload(json!([{"id": 3, "name": "X", "startDate": "whenever"}]));
        assert_eq!(meds[0].id, "3");
        assert_eq!(meds[0].start_date, None);
    }

    #[test]
    fn malformed_medication_records_are_skipped() {
        let meds = medications_from_payload(json!([
            {"name": "no id"},
            {"id": "ok", "name": 12},
            med_json("good")
        ]));
        assert_eq!(meds.len(), 1);
        assert_eq!(meds[0].id, "good");
    }

    #[test]
    fn log_medication_id_as_plain_string_or_object() {
        let logs = logs_from_payload(json!([
            {"_id": "l1", "medicationId": "m1", "status": "taken", "takenAt": "2024-06-15T08:05:00"},
            {"_id": "l2", "medicationId": {"_id": "m1", "name": "Metformin", "dosage": "500mg"}, "status": "missed",
             "scheduledTime": "2024-06-15T20:00"}
        ]));
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].medication.key(), logs[1].medication.key());
        assert_eq!(logs[1].medication.name.as_deref(), Some("Metformin"));
        assert_eq!(logs[1].status, LogStatus::Missed);
    }

    #[test]
    fn log_falls_back_to_top_level_medication_name() {
        let logs = logs_from_payload(json!({"logs": [
            {"id": "l1", "medicationId": "m9", "medicationName": "Old Med", "status": "taken"}
        ]}));
        assert_eq!(logs[0].medication.name.as_deref(), Some("Old Med"));
    }

    #[test]
    fn log_without_status_is_pending_and_unknown_status_is_skipped() {
        let logs = logs_from_payload(json!([
            {"id": "l1", "medicationId": "m1"},
            {"id": "l2", "medicationId": "m1", "status": "teleported"},
            {"id": "l3", "status": "taken"}
        ]));
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].status, LogStatus::Pending);
    }
}
