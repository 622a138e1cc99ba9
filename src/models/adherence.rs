use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// LogStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Taken,
    Missed,
    Skipped,
    Pending,
}

impl FromStr for LogStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "taken" => Ok(Self::Taken),
            "missed" => Ok(Self::Missed),
            "skipped" => Ok(Self::Skipped),
            "pending" => Ok(Self::Pending),
            other => Err(anyhow::anyhow!("unknown log status: {other}")),
        }
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Taken => write!(f, "taken"),
            Self::Missed => write!(f, "missed"),
            Self::Skipped => write!(f, "skipped"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

// ---------------------------------------------------------------------------
// MedicationRef
// ---------------------------------------------------------------------------

/// The medication an adherence log points at, with whatever display fields
/// the record store denormalized onto the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
}

impl MedicationRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            dosage: None,
        }
    }

    /// Bucketing key shared by every call site that groups logs by medication.
    pub fn key(&self) -> &str {
        self.id.trim()
    }
}

// ---------------------------------------------------------------------------
// AdherenceLog
// ---------------------------------------------------------------------------

/// One recorded dose event. Timestamps are local wall-clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdherenceLog {
    pub id: String,
    #[serde(rename = "medicationId")]
    pub medication: MedicationRef,
    pub status: LogStatus,
    #[serde(default)]
    pub scheduled_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub taken_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl AdherenceLog {
    /// `taken_at`, else `scheduled_time`, else `created_at`.
    pub fn effective_timestamp(&self) -> Option<NaiveDateTime> {
        self.taken_at.or(self.scheduled_time).or(self.created_at)
    }

    /// Calendar date the log is attributed to.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.effective_timestamp().map(|ts| ts.date())
    }

    /// Time of day shown for the log; the nominal due time comes first.
    pub fn reported_time(&self) -> Option<NaiveTime> {
        self.scheduled_time
            .or(self.taken_at)
            .or(self.created_at)
            .map(|ts| ts.time())
    }

    pub fn reported_time_label(&self) -> Option<String> {
        self.reported_time().map(|t| t.format("%H:%M").to_string())
    }
}

// ---------------------------------------------------------------------------
// NewLog
// ---------------------------------------------------------------------------

/// Request body for creating an adherence log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLog {
    pub medication_id: String,
    pub scheduled_time: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taken_at: Option<NaiveDateTime>,
    pub status: LogStatus,
}

impl NewLog {
    /// A dose taken at `now` for the slot `date` + `time`.
    pub fn taken(
        medication_id: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            medication_id: medication_id.into(),
            scheduled_time: date.and_time(time),
            taken_at: Some(now),
            status: LogStatus::Taken,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
