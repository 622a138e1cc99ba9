use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;
use std::io::{self, BufRead, Write};

use doseline::models::med::{Frequency, Medication, ScheduleEntry};

use super::{Env, print_success, reminders, today};

pub struct AddParams {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub at: Vec<String>,
    pub instructions: String,
}

pub fn run_add(params: AddParams, date: Option<NaiveDate>, human: bool) -> Result<()> {
    let name = params.name.trim();
    if name.is_empty() {
        anyhow::bail!("medication name must not be empty");
    }
    let start = params.start.or(date).unwrap_or_else(today);
    if let Some(end) = params.end
        && end < start
    {
        anyhow::bail!("end date {end} is before start date {start}");
    }
    let schedule = params
        .at
        .iter()
        .map(|s| s.parse::<ScheduleEntry>())
        .collect::<Result<Vec<_>>>()?;

    let mut med = Medication::new(name, Frequency::from(params.frequency), start);
    med.dosage = params.dosage.trim().to_string();
    med.end_date = params.end;
    med.schedule = schedule;
    med.instructions = params.instructions;

    let env = Env::open()?;
    env.db.insert_medication(&med)?;
    tracing::info!(medication = %med.id, name = %med.name, "medication added");
    let report = reminders::sync_from_store(&env, today())?;

    if human {
        println!("Added {} ({})", med.name, med.frequency);
        if let Some(report) = &report {
            println!("{}", doseline::output::human::format_reminder_report(report));
        }
    } else {
        print_success(
            "med_add",
            json!({
                "medication": med,
                "reminders": report,
            }),
        )?;
    }
    Ok(())
}

pub fn run_list(all: bool, human: bool) -> Result<()> {
    let env = Env::open()?;
    let today = today();
    let meds = env
        .db
        .list_medications(if all { None } else { Some(today) })?;

    if human {
        println!("{}", doseline::output::human::format_med_list(&meds, today));
    } else {
        let count = meds.len();
        print_success(
            "med_list",
            json!({
                "medications": meds,
                "count": count,
            }),
        )?;
    }
    Ok(())
}

pub fn run_end(key: &str, date: Option<NaiveDate>, human: bool) -> Result<()> {
    let env = Env::open()?;
    let Some(med) = env.db.get_medication(key)? else {
        anyhow::bail!("Medication '{}' not found.", key);
    };
    let end = date.unwrap_or_else(today);
    if let Some(start) = med.start_date
        && end < start
    {
        anyhow::bail!("end date {end} is before start date {start}");
    }
    env.db.end_medication(&med.id, end)?;
    tracing::info!(medication = %med.id, %end, "medication ended");
    let report = reminders::sync_from_store(&env, today())?;

    if human {
        println!("Ended {} on {}", med.name, end);
    } else {
        print_success(
            "med_end",
            json!({
                "id": med.id,
                "name": med.name,
                "end_date": end,
                "reminders": report,
            }),
        )?;
    }
    Ok(())
}

pub fn run_remove(key: &str, yes: bool, human: bool) -> Result<()> {
    let env = Env::open()?;
    let Some(med) = env.db.get_medication(key)? else {
        anyhow::bail!("Medication '{}' not found.", key);
    };

    if !yes {
        eprint!(
            "Permanently delete medication '{}'? Dose history will be preserved. [y/N] ",
            med.name
        );
        io::stderr().flush().ok();
        let mut buf = String::new();
        let bytes = io::stdin().lock().read_line(&mut buf)?;
        if bytes == 0 || !buf.trim().eq_ignore_ascii_case("y") {
            anyhow::bail!("Aborted.");
        }
    }

    if !env.db.remove_medication(&med.id)? {
        anyhow::bail!("Medication '{}' not found.", key);
    }
    tracing::info!(medication = %med.id, "medication removed");
    let report = reminders::sync_from_store(&env, today())?;

    if human {
        println!("Removed medication: {}", med.name);
    } else {
        print_success(
            "med_remove",
            json!({
                "id": med.id,
                "name": med.name,
                "removed": true,
                "reminders": report,
            }),
        )?;
    }
    Ok(())
}
