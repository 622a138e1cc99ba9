use anyhow::Result;
use serde_json::json;

use doseline::core::next_dose;

use super::{Env, now, print_success};

pub fn run(limit: Option<usize>, human: bool) -> Result<()> {
    let env = Env::open()?;
    let now = now();
    let limit = limit.unwrap_or(env.config.upcoming.limit);
    let mut controller = env.controller(now.date());
    controller.refresh();
    let doses = next_dose::upcoming_doses(controller.medications(), now, limit);

    if human {
        println!("{}", doseline::output::human::format_upcoming(&doses));
    } else {
        let count = doses.len();
        print_success(
            "upcoming",
            json!({
                "doses": doses,
                "count": count,
            }),
        )?;
    }
    Ok(())
}
