mod cli;
mod cmd;

use clap::Parser;
use cli::{Cli, Commands, ConfigAction, DoseAction, MedAction, RemindersAction};
use doseline::core::error::CoreError;
use doseline::models::config::Config;
use doseline::output;
use std::process;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let fallback = Config::load()
        .map(|c| c.logging.filter)
        .unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("DOSELINE_LOG").unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn error_code(e: &anyhow::Error) -> &'static str {
    match e.downcast_ref::<CoreError>() {
        Some(CoreError::Unauthenticated) => "unauthenticated",
        Some(CoreError::NotFound(_)) => "not_found",
        Some(CoreError::InvalidInput(_)) => "invalid_input",
        Some(CoreError::Transport(_)) => "transport_error",
        None => "general_error",
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let (command, result) = match cli.command {
        Commands::Init => ("init", cmd::init::run(cli.human)),
        Commands::Med { action } => match action {
            MedAction::Add {
                name,
                dosage,
                frequency,
                start,
                end,
                at,
                instructions,
            } => (
                "med_add",
                cmd::med::run_add(
                    cmd::med::AddParams {
                        name,
                        dosage,
                        frequency,
                        start,
                        end,
                        at,
                        instructions,
                    },
                    cli.date,
                    cli.human,
                ),
            ),
            MedAction::List { all } => ("med_list", cmd::med::run_list(all, cli.human)),
            MedAction::End { medication } => (
                "med_end",
                cmd::med::run_end(&medication, cli.date, cli.human),
            ),
            MedAction::Remove { medication, yes } => (
                "med_remove",
                cmd::med::run_remove(&medication, yes, cli.human),
            ),
        },
        Commands::Dose { action } => match action {
            DoseAction::Take { medication, at } => (
                "dose_take",
                cmd::dose::run_take(&medication, at.as_deref(), cli.date, cli.human),
            ),
            DoseAction::Undo => ("dose_undo", cmd::dose::run_undo(cli.human)),
        },
        Commands::Day => ("day", cmd::day::run(cli.date, cli.human)),
        Commands::Calendar => ("calendar", cmd::calendar::run(cli.date, cli.human)),
        Commands::Stats => ("stats", cmd::stats::run(cli.human)),
        Commands::Upcoming { limit } => ("upcoming", cmd::upcoming::run(limit, cli.human)),
        Commands::Reminders { action } => match action {
            RemindersAction::Sync => ("reminders_sync", cmd::reminders::run_sync(cli.human)),
            RemindersAction::List => ("reminders_list", cmd::reminders::run_list(cli.human)),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => ("config", cmd::config::run_show(cli.human)),
            ConfigAction::Set { key, value } => ("config", cmd::config::run_set(&key, &value)),
        },
        Commands::Completions { shell } => ("completions", cmd::completions::run(shell)),
    };

    if let Err(e) = result {
        let err = output::error(command, error_code(&e), &e.to_string());
        eprintln!("{err}");
        process::exit(1);
    }
}
