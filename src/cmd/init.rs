use anyhow::Result;
use serde_json::json;

use doseline::db::Database;
use doseline::models::config::Config;
use doseline::models::session::SessionState;

use super::print_success;

pub fn run(human: bool) -> Result<()> {
    let config = Config::load().unwrap_or_default();
    config.save()?;
    Database::open(&Config::db_path())?;

    let mut session = SessionState::load().unwrap_or_default();
    let created = session.ensure_credential();
    session.save()?;
    if created {
        tracing::info!("issued new session credential");
    }

    if human {
        println!("Initialized doseline at {}", Config::data_dir().display());
        if !created {
            println!("Existing session kept.");
        }
    } else {
        print_success(
            "init",
            json!({
                "data_dir": Config::data_dir(),
                "credential_created": created,
            }),
        )?;
    }
    Ok(())
}
