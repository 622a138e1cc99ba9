use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;

use super::{Env, print_success, today};

pub fn run(date: Option<NaiveDate>, human: bool) -> Result<()> {
    let env = Env::open()?;
    let date = date.unwrap_or_else(today);
    let mut controller = env.controller(date);
    controller.refresh();
    let entries = controller.day(date);

    if human {
        println!("{}", doseline::output::human::format_day(date, &entries));
    } else {
        print_success(
            "day",
            json!({
                "date": date,
                "weekday": date.format("%A").to_string(),
                "entries": entries,
            }),
        )?;
    }
    Ok(())
}
