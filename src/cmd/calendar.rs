use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;
use std::time::Instant;

use doseline::core::calendar;

use super::{Env, print_success, today};

pub fn run(date: Option<NaiveDate>, human: bool) -> Result<()> {
    let env = Env::open()?;
    let today = today();
    let selected = date.unwrap_or(today);
    let mut controller = env.controller(selected);
    controller.refresh();
    let marks = controller.calendar(selected, today, Instant::now());

    if human {
        println!(
            "{}",
            doseline::output::human::format_calendar(&marks, selected)
        );
    } else {
        let (start, end) = calendar::window(selected);
        print_success(
            "calendar",
            json!({
                "selected": selected,
                "start": start,
                "end": end,
                "marks": marks,
            }),
        )?;
    }
    Ok(())
}
