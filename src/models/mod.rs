pub mod adherence;
pub mod config;
pub mod med;
pub mod session;

pub use adherence::{AdherenceLog, LogStatus, MedicationRef, NewLog};
pub use med::{Frequency, Medication, ScheduleEntry};
