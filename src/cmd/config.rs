use anyhow::Result;
use serde_json::json;

use doseline::models::config::Config;

use super::print_success;

pub fn run_show(human: bool) -> Result<()> {
    let config = Config::load()?;
    if human {
        let toml_str = toml::to_string_pretty(&config)?;
        println!("{}", toml_str);
    } else {
        print_success("config", json!({ "config": config }))?;
    }
    Ok(())
}

pub fn run_set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;

    match key {
        "reminders.enabled" => config.reminders.enabled = value.parse()?,
        "calendar.recompute_cooldown_ms" => config.calendar.recompute_cooldown_ms = value.parse()?,
        "upcoming.limit" => {
            let limit: usize = value.parse()?;
            if limit == 0 {
                anyhow::bail!("upcoming.limit must be at least 1");
            }
            config.upcoming.limit = limit;
        }
        "logging.filter" => config.logging.filter = value.to_string(),
        _ => anyhow::bail!("unknown config key: {}", key),
    }

    config.save()?;
    print_success("config", json!({ "key": key, "value": value }))
}
