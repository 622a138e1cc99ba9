use chrono::{Datelike, NaiveDate};
use colored::Colorize;
use comfy_table::Table;

use crate::core::adherence::AdherenceSummary;
use crate::core::calendar::{MarkTone, Marks};
use crate::core::day::{DayEntry, DoseKind};
use crate::core::dose_action::{Notice, NoticeKind};
use crate::core::next_dose::UpcomingDose;
use crate::core::reminders::ReminderReport;
use crate::db::reminders::StoredReminder;
use crate::models::med::Medication;

/// Tabular medication listing.
pub fn format_med_list(meds: &[Medication], today: NaiveDate) -> String {
    if meds.is_empty() {
        return "No medications.".to_string();
    }
    let mut table = Table::new();
    table.set_header(vec!["Name", "Dosage", "Frequency", "Schedule", "Start", "End"]);
    for m in meds {
        let schedule: Vec<String> = m.schedule.iter().map(|e| e.to_string()).collect();
        let end = match m.end_date {
            Some(d) if m.is_ended_on(today) => format!("{d} (ended)"),
            Some(d) => d.to_string(),
            None => "-".to_string(),
        };
        table.add_row(vec![
            m.name.clone(),
            m.dosage.clone(),
            m.frequency.to_string(),
            schedule.join("; "),
            m.start_date.map(|d| d.to_string()).unwrap_or_else(|| "?".into()),
            end,
        ]);
    }
    table.to_string()
}

/// Day view: one block per medication, one line per dose.
pub fn format_day(date: NaiveDate, entries: &[DayEntry]) -> String {
    let mut out = format!("=== {} ({}) ===", date, date.format("%A"));
    if entries.is_empty() {
        out.push_str("\nNothing scheduled or logged.");
        return out;
    }
    for entry in entries {
        let med = &entry.medication;
        let mut title = if med.dosage.is_empty() {
            med.name.clone()
        } else {
            format!("{} {}", med.name, med.dosage)
        };
        if entry.ended {
            title.push_str(" [ended]");
        }
        if entry.orphaned {
            title.push_str(" [deleted]");
        }
        out.push_str(&format!("\n{}", title.bold()));

        for dose in &entry.doses {
            let time = dose
                .time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_else(|| "--:--".into());
            let status = match (&dose.log, dose.kind) {
                (Some(log), _) => log.status.to_string(),
                (None, DoseKind::Scheduled) if dose.can_log => "due".to_string(),
                (None, _) => "-".to_string(),
            };
            let marker = match dose.kind {
                DoseKind::Scheduled => "",
                DoseKind::Unscheduled => " (unscheduled)",
            };
            out.push_str(&format!("\n  {time}  {status}{marker}"));
        }
    }
    out
}

fn paint(cell: String, tone: Option<MarkTone>, selected: bool) -> String {
    let painted = match tone {
        Some(MarkTone::ConfirmedPast) => cell.green().bold(),
        Some(MarkTone::ConfirmedFuture) => cell.cyan().bold(),
        Some(MarkTone::UnconfirmedPast) => cell.yellow(),
        Some(MarkTone::UnconfirmedFuture) => cell.blue(),
        None => cell.normal(),
    };
    if selected {
        painted.reversed().to_string()
    } else {
        painted.to_string()
    }
}

/// Month grid for the selected date's month, coloured by mark tone.
pub fn format_calendar(marks: &Marks, selected: NaiveDate) -> String {
    let mut out = format!("{}\nMo Tu We Th Fr Sa Su\n", selected.format("%B %Y"));
    let Some(first) = selected.with_day(1) else {
        return out;
    };
    let offset = first.weekday().num_days_from_monday() as usize;
    out.push_str(&"   ".repeat(offset));

    let mut column = offset;
    for date in first.iter_days().take_while(|d| d.month() == first.month()) {
        let mark = marks.get(&date);
        let cell = paint(
            format!("{:>2}", date.day()),
            mark.and_then(|m| m.tone()),
            mark.is_some_and(|m| m.selected),
        );
        out.push_str(&cell);
        column += 1;
        if column % 7 == 0 {
            out.push('\n');
        } else {
            out.push(' ');
        }
    }

    let marked = marks.values().filter(|m| m.tone().is_some()).count();
    out.push_str(&format!("\n{marked} marked day(s) in window"));
    out
}

pub fn format_summary(label: &str, s: &AdherenceSummary) -> String {
    format!(
        "{label}: {}/{} taken, {} missed ({:.0}%)",
        s.taken,
        s.total,
        s.missed,
        s.rate * 100.0
    )
}

pub fn format_upcoming(doses: &[UpcomingDose]) -> String {
    if doses.is_empty() {
        return "No upcoming doses.".to_string();
    }
    doses
        .iter()
        .map(|d| {
            let dosage = if d.dosage.is_empty() {
                String::new()
            } else {
                format!(" {}", d.dosage)
            };
            format!("{}  {}{}", d.due_at.format("%Y-%m-%d %H:%M"), d.name, dosage)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_notice(notice: &Notice) -> String {
    match notice.kind {
        NoticeKind::Success => notice.message.green().to_string(),
        NoticeKind::Error => notice.message.red().to_string(),
    }
}

pub fn format_reminder_report(report: &ReminderReport) -> String {
    let mut out = format!("Scheduled {} reminder(s)", report.scheduled.len());
    if report.failed > 0 {
        out.push_str(&format!(", {} failed", report.failed));
    }
    for r in &report.scheduled {
        out.push_str(&format!("\n  {}  {}", r.fire_time.format("%H:%M"), r.medication));
    }
    out
}

pub fn format_reminder_list(reminders: &[StoredReminder]) -> String {
    if reminders.is_empty() {
        return "No reminders scheduled.".to_string();
    }
    let mut table = Table::new();
    table.set_header(vec!["Time", "Medication", "Handle"]);
    for r in reminders {
        table.add_row(vec![r.fire_time.clone(), r.medication_name.clone(), r.id.clone()]);
    }
    table.to_string()
}
