use chrono::{NaiveDate, NaiveTime, TimeDelta, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Frequency
// ---------------------------------------------------------------------------

/// How often a medication is taken.
///
/// Parsed from free text the way prescriptions are usually written
/// (`"twice-daily"`, `"every 6 hours"`, `"as needed"`). Text that matches no
/// known pattern is kept verbatim as `Unknown` and dosed like `OnceDaily`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    OnceDaily,
    TwiceDaily,
    EveryNHours(u32),
    Weekly,
    AsNeeded,
    Custom,
    Unknown(String),
}

impl Frequency {
    /// Interval between two doses as used for next-dose previews.
    pub fn dose_interval(&self) -> TimeDelta {
        match self {
            Self::TwiceDaily => TimeDelta::hours(12),
            Self::EveryNHours(n) => TimeDelta::hours(i64::from(*n)),
            Self::OnceDaily | Self::Weekly | Self::AsNeeded | Self::Custom | Self::Unknown(_) => {
                TimeDelta::days(1)
            }
        }
    }
}

fn first_integer(s: &str) -> Option<u32> {
    let re = Regex::new(r"\d+").ok()?;
    re.find(s)?.as_str().parse().ok()
}

impl FromStr for Frequency {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower.contains("twice") {
            return Ok(Self::TwiceDaily);
        }
        if lower.contains("daily") {
            return Ok(Self::OnceDaily);
        }
        if lower.contains("every")
            && let Some(hours) = first_integer(&lower)
        {
            return Ok(Self::EveryNHours(hours));
        }
        Ok(if lower.contains("week") {
            Self::Weekly
        } else if lower.contains("needed") || lower == "prn" {
            Self::AsNeeded
        } else if lower == "custom" {
            Self::Custom
        } else {
            Self::Unknown(s.trim().to_string())
        })
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnceDaily => write!(f, "once-daily"),
            Self::TwiceDaily => write!(f, "twice-daily"),
            Self::EveryNHours(n) => write!(f, "every-{n}-hours"),
            Self::Weekly => write!(f, "weekly"),
            Self::AsNeeded => write!(f, "as-needed"),
            Self::Custom => write!(f, "custom"),
            Self::Unknown(raw) => write!(f, "{raw}"),
        }
    }
}

impl From<String> for Frequency {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(freq) => freq,
            Err(never) => match never {},
        }
    }
}

impl From<Frequency> for String {
    fn from(freq: Frequency) -> Self {
        freq.to_string()
    }
}

// ---------------------------------------------------------------------------
// ScheduleEntry
// ---------------------------------------------------------------------------

/// One recurring dose rule: a local wall-clock time on a set of weekdays.
///
/// An empty `days` list is the legacy "unspecified" form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    #[serde(default, with = "weekday_names")]
    pub days: Vec<Weekday>,
}

pub const ALL_DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

impl ScheduleEntry {
    pub fn new(time: NaiveTime, days: impl IntoIterator<Item = Weekday>) -> Self {
        let mut unique = Vec::new();
        for day in days {
            if !unique.contains(&day) {
                unique.push(day);
            }
        }
        Self { time, days: unique }
    }

    pub fn applies_on(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }

    /// `HH:MM` rendering used for display and time matching.
    pub fn time_label(&self) -> String {
        self.time.format("%H:%M").to_string()
    }
}

/// Parse a `HH:MM` or `HH:MM:SS` time of day.
pub fn parse_time_of_day(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// Parse a weekday name (`"Monday"`, `"mon"`, case-insensitive).
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    s.trim().parse().ok()
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parses `"08:00"` (every day), `"08:00@mon,wed"` or `"21:30@daily"`.
impl FromStr for ScheduleEntry {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (time_part, days_part) = match s.split_once('@') {
            Some((t, d)) => (t, Some(d)),
            None => (s, None),
        };
        let time = parse_time_of_day(time_part)
            .ok_or_else(|| anyhow::anyhow!("invalid time of day: {time_part} (expected HH:MM)"))?;

        let days = match days_part.map(str::trim) {
            None | Some("daily") => ALL_DAYS.to_vec(),
            Some(list) => list
                .split(',')
                .map(|d| parse_weekday(d).ok_or_else(|| anyhow::anyhow!("invalid weekday: {d}")))
                .collect::<anyhow::Result<Vec<_>>>()?,
        };
        Ok(Self::new(time, days))
    }
}

impl fmt::Display for ScheduleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days.len() == ALL_DAYS.len() {
            return write!(f, "{} daily", self.time_label());
        }
        let days: Vec<String> = self.days.iter().map(|d| d.to_string()).collect();
        write!(f, "{} {}", self.time_label(), days.join(","))
    }
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_time_of_day(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid time of day: {raw}")))
    }
}

mod weekday_names {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(days: &[Weekday], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(days.iter().map(|d| super::weekday_name(*d)))
    }

    /// Unknown names are dropped rather than failing the whole entry.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Weekday>, D::Error> {
        let raw = Option::<Vec<String>>::deserialize(d)?.unwrap_or_default();
        Ok(raw.iter().filter_map(|n| super::parse_weekday(n)).collect())
    }
}

// ---------------------------------------------------------------------------
// Medication
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    pub frequency: Frequency,
    /// `None` when the record store sent a date that could not be read.
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub schedule: Vec<ScheduleEntry>,
    #[serde(default)]
    pub instructions: String,
}

impl Medication {
    /// Create a new medication starting on `start_date` with no schedule.
    pub fn new(name: impl Into<String>, frequency: Frequency, start_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            dosage: String::new(),
            frequency,
            start_date: Some(start_date),
            end_date: None,
            schedule: Vec::new(),
            instructions: String::new(),
        }
    }

    /// Stand-in for a medication that adherence logs still reference but the
    /// record store no longer returns.
    pub fn placeholder(id: impl Into<String>, name: impl Into<String>, dosage: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            dosage: dosage.into(),
            frequency: Frequency::Unknown(String::new()),
            start_date: None,
            end_date: None,
            schedule: Vec::new(),
            instructions: String::new(),
        }
    }

    /// A missing start date puts no lower bound on the medication.
    pub fn has_started_by(&self, date: NaiveDate) -> bool {
        self.start_date.is_none_or(|start| start <= date)
    }

    pub fn is_ended_on(&self, date: NaiveDate) -> bool {
        self.end_date.is_some_and(|end| end < date)
    }

    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.has_started_by(date) && !self.is_ended_on(date)
    }

    /// Schedule entries that apply on `day`. Entries with no days never apply.
    pub fn entries_on(&self, day: Weekday) -> impl Iterator<Item = &ScheduleEntry> {
        self.schedule.iter().filter(move |e| e.applies_on(day))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
