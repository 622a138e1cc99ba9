pub mod adherence;
pub mod calendar;
pub mod day;
pub mod dose_action;
pub mod error;
pub mod ingest;
pub mod next_dose;
pub mod recompute;
pub mod reminders;
pub mod store;
