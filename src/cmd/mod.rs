pub mod calendar;
pub mod completions;
pub mod config;
pub mod day;
pub mod dose;
pub mod init;
pub mod med;
pub mod reminders;
pub mod stats;
pub mod upcoming;

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use serde_json::Value;
use std::time::Duration;

use doseline::core::dose_action::DoseController;
use doseline::db::Database;
use doseline::models::config::Config;
use doseline::models::session::SessionState;
use doseline::output;

/// Everything a command needs from the data directory.
pub struct Env {
    pub config: Config,
    pub db: Database,
    pub session: SessionState,
}

impl Env {
    pub fn open() -> Result<Self> {
        Ok(Self {
            config: Config::load()?,
            db: Database::open(&Config::db_path())?,
            session: SessionState::load()?,
        })
    }

    /// Controller over the local store, with the persisted undo slot.
    pub fn controller(&self, focus: NaiveDate) -> DoseController<&Database, &SessionState> {
        DoseController::new(&self.db, &self.session, focus)
            .with_last_log(self.session.last_log_id.clone())
            .with_recompute_cooldown(Duration::from_millis(
                self.config.calendar.recompute_cooldown_ms,
            ))
    }
}

/// Local wall-clock time truncated to whole seconds.
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn print_success(command: &str, data: Value) -> Result<()> {
    let out = output::success(command, data);
    println!("{}", serde_json::to_string(&out)?);
    Ok(())
}
