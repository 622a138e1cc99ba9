use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;

use doseline::core::reminders::{self, ReminderReport};

use super::{Env, print_success, today};

/// Reschedule reminders for every medication in the store, read through a
/// fresh controller. `None` when reminders are disabled or the read came back
/// empty or failed.
pub fn sync_from_store(env: &Env, today: NaiveDate) -> Result<Option<ReminderReport>> {
    if !env.config.reminders.enabled {
        return Ok(None);
    }
    let mut controller = env.controller(today);
    let refresh = controller.refresh();
    if !refresh.medications_changed {
        return Ok(None);
    }
    Ok(Some(reminders::schedule_all(
        &env.db,
        controller.medications(),
        today,
    )))
}

pub fn run_sync(human: bool) -> Result<()> {
    let env = Env::open()?;
    if !env.config.reminders.enabled {
        if human {
            println!("Reminders are disabled (config key reminders.enabled).");
        } else {
            print_success("reminders_sync", json!({ "enabled": false }))?;
        }
        return Ok(());
    }

    let today = today();
    let meds = env.db.list_medications(Some(today))?;
    let report = reminders::schedule_all(&env.db, &meds, today);

    if human {
        println!("{}", doseline::output::human::format_reminder_report(&report));
    } else {
        print_success(
            "reminders_sync",
            json!({
                "enabled": true,
                "scheduled": report.scheduled,
                "failed": report.failed,
            }),
        )?;
    }
    Ok(())
}

pub fn run_list(human: bool) -> Result<()> {
    let env = Env::open()?;
    let reminders = env.db.list_reminders()?;

    if human {
        println!("{}", doseline::output::human::format_reminder_list(&reminders));
    } else {
        let count = reminders.len();
        print_success(
            "reminders_list",
            json!({
                "reminders": reminders,
                "count": count,
            }),
        )?;
    }
    Ok(())
}
