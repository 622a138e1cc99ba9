use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::med::Medication;

/// Number of entries in the upcoming-doses preview.
pub const UPCOMING_LIMIT: usize = 5;

/// Approximate next due time for a medication.
///
/// Before the start date the next dose is the start date itself (at local
/// midnight); afterwards it is `now` plus the frequency's dose interval.
/// Schedule entries are not consulted. `None` means "no known next dose":
/// the start date was unreadable or the result overflowed.
pub fn next_dose(med: &Medication, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let start = med.start_date?.and_hms_opt(0, 0, 0)?;
    if now < start {
        return Some(start);
    }
    now.checked_add_signed(med.frequency.dose_interval())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpcomingDose {
    pub medication_id: String,
    pub name: String,
    pub dosage: String,
    pub due_at: NaiveDateTime,
}

/// Soonest strictly-future next doses, capped at `limit`.
pub fn upcoming_doses(
    medications: &[Medication],
    now: NaiveDateTime,
    limit: usize,
) -> Vec<UpcomingDose> {
    let today = now.date();
    let mut upcoming: Vec<UpcomingDose> = medications
        .iter()
        .filter(|med| !med.is_ended_on(today))
        .filter_map(|med| {
            let due_at = next_dose(med, now)?;
            (due_at > now).then(|| UpcomingDose {
                medication_id: med.id.clone(),
                name: med.name.clone(),
                dosage: med.dosage.clone(),
                due_at,
            })
        })
        .collect();

    upcoming.sort_by(|a, b| a.due_at.cmp(&b.due_at).then_with(|| a.name.cmp(&b.name)));
    upcoming.truncate(limit);
    upcoming
}
