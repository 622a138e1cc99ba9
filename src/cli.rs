use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(
    name = "doseline",
    version,
    about = "Medication schedules and adherence tracking"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as human-readable text instead of JSON
    #[arg(long = "human", short = 'H', global = true)]
    pub human: bool,

    /// Override the selected date (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub date: Option<NaiveDate>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory, config and session
    Init,

    /// Manage medications
    Med {
        #[command(subcommand)]
        action: MedAction,
    },

    /// Log or undo doses
    Dose {
        #[command(subcommand)]
        action: DoseAction,
    },

    /// Scheduled and logged doses for the selected date
    Day,

    /// Calendar marks around the selected date
    Calendar,

    /// Adherence summaries
    Stats,

    /// Next doses across all medications
    Upcoming {
        /// Maximum number of doses to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Manage dose reminders
    Reminders {
        #[command(subcommand)]
        action: RemindersAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Print shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum MedAction {
    /// Add a medication
    Add {
        /// Medication name
        name: String,

        /// Dose amount (e.g. "500mg")
        #[arg(long, default_value = "")]
        dosage: String,

        /// Frequency (once-daily, twice-daily, every-8-hours, weekly, as-needed)
        #[arg(long = "freq", default_value = "once-daily")]
        frequency: String,

        /// Start date (default: selected date)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day of the course
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Schedule entry, HH:MM or HH:MM@mon,wed (repeatable)
        #[arg(long = "at")]
        at: Vec<String>,

        /// Free-text instructions
        #[arg(long, default_value = "")]
        instructions: String,
    },

    /// List medications
    List {
        /// Include ended medications
        #[arg(long)]
        all: bool,
    },

    /// End a medication course on the selected date
    End {
        /// Medication id or name
        medication: String,
    },

    /// Permanently delete a medication (its logs are kept)
    Remove {
        /// Medication id or name
        medication: String,

        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum DoseAction {
    /// Log a dose as taken
    Take {
        /// Medication id or name
        medication: String,

        /// Scheduled slot (HH:MM, default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Remove the most recently logged dose
    Undo,
}

#[derive(Subcommand)]
pub enum RemindersAction {
    /// Schedule a reminder for every schedule entry
    Sync,
    /// List scheduled reminders
    List,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set a config value
    Set {
        /// Config key (e.g. reminders.enabled, upcoming.limit)
        key: String,
        /// Config value
        value: String,
    },
}
