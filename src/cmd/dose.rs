use anyhow::Result;
use chrono::{NaiveDate, Timelike};
use serde_json::json;

use doseline::models::med::parse_time_of_day;

use super::{Env, now, print_success};

pub fn run_take(key: &str, at: Option<&str>, date: Option<NaiveDate>, human: bool) -> Result<()> {
    let mut env = Env::open()?;
    let now = now();
    let date = date.unwrap_or(now.date());
    let time = match at {
        Some(s) => parse_time_of_day(s)
            .ok_or_else(|| anyhow::anyhow!("invalid time '{s}', expected HH:MM"))?,
        None => now.time().with_second(0).unwrap_or(now.time()),
    };

    // Names resolve locally; anything else goes to the store as an id.
    let medication_id = match env.db.get_medication(key)? {
        Some(med) => med.id,
        None => key.to_string(),
    };

    let mut controller = env.controller(date);
    let log = controller.log_dose(&medication_id, date, time, now)?;
    let notice = controller.visible_notice(now).cloned();
    let last_log_id = controller.last_log_id().map(str::to_string);

    env.session.last_log_id = last_log_id;
    env.session.save()?;

    if human {
        let name = log.medication.name.as_deref().unwrap_or(&medication_id);
        println!("Logged {} for {} {}", name, date, time.format("%H:%M"));
        if let Some(notice) = &notice {
            println!("{}", doseline::output::human::format_notice(notice));
        }
    } else {
        print_success(
            "dose_take",
            json!({
                "log": log,
                "notice": notice,
            }),
        )?;
    }
    Ok(())
}

pub fn run_undo(human: bool) -> Result<()> {
    let mut env = Env::open()?;
    let now = now();
    let mut controller = env.controller(now.date());
    let undone_id = controller.last_log_id().map(str::to_string);
    let undone = controller.undo_last(now)?;
    let notice = controller.visible_notice(now).cloned();

    let log_id = if undone { undone_id } else { None };
    if undone {
        env.session.last_log_id = None;
        env.session.save()?;
    }

    if human {
        match &notice {
            Some(notice) if undone => println!("{}", doseline::output::human::format_notice(notice)),
            _ => println!("Nothing to undo."),
        }
    } else {
        print_success(
            "dose_undo",
            json!({
                "undone": undone,
                "log_id": log_id,
                "notice": notice,
            }),
        )?;
    }
    Ok(())
}
