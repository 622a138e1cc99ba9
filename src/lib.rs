//! Medication schedules and adherence reconciliation.
//!
//! - [`models`]: medications, schedule entries, adherence logs, config
//! - [`core`]: ingestion, next-dose preview, day resolver, calendar marks,
//!   adherence summaries, the dose action controller and reminder driving
//! - [`db`]: local SQLite record store and reminder scheduler
//! - [`output`]: JSON envelope and human-readable rendering

pub mod core;
pub mod db;
pub mod models;
pub mod output;
