use anyhow::Result;
use serde_json::json;

use doseline::core::adherence::RECENT_WINDOW_DAYS;
use doseline::core::dose_action::SliceOutcome;

use super::{Env, print_success, today};

pub fn run(human: bool) -> Result<()> {
    let env = Env::open()?;
    let today = today();
    let mut controller = env.controller(today);
    let refresh = controller.refresh();
    if let Some(err) = [&refresh.logs, &refresh.stats]
        .into_iter()
        .find_map(|s| match s {
            SliceOutcome::Failed(e) => Some(e),
            _ => None,
        })
    {
        anyhow::bail!("could not read adherence data: {err}");
    }
    let all_time = controller.stats();
    let recent = controller.recent_summary(today);

    if human {
        println!(
            "{}",
            doseline::output::human::format_summary("All time", &all_time)
        );
        println!(
            "{}",
            doseline::output::human::format_summary(
                &format!("Last {RECENT_WINDOW_DAYS} days"),
                &recent
            )
        );
    } else {
        print_success(
            "stats",
            json!({
                "all_time": all_time,
                "recent": recent,
                "recent_window_days": RECENT_WINDOW_DAYS,
            }),
        )?;
    }
    Ok(())
}
