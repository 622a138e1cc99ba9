//! Logging and undoing doses against the record store, and the client-side
//! state that those actions refresh.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::Serialize;
use std::time::{Duration, Instant};

use crate::core::adherence::{self, AdherenceSummary};
use crate::core::calendar::{self, Marks};
use crate::core::day::{self, DayEntry};
use crate::core::error::{CoreError, CoreResult};
use crate::core::ingest;
use crate::core::recompute::Recompute;
use crate::core::store::{RecordStore, SessionProvider};
use crate::models::adherence::{AdherenceLog, NewLog};
use crate::models::med::Medication;

/// How long a notice stays visible.
pub const NOTICE_MILLIS: i64 = 2500;

pub const DEFAULT_RECOMPUTE_COOLDOWN: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionState {
    Idle,
    Logging,
    Logged,
    Undoing,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient advisory message. A newer notice replaces an older one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub shown_at: NaiveDateTime,
}

impl Notice {
    pub fn is_visible(&self, now: NaiveDateTime) -> bool {
        now >= self.shown_at && now - self.shown_at < TimeDelta::milliseconds(NOTICE_MILLIS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "error", rename_all = "snake_case")]
pub enum SliceOutcome {
    Updated,
    Failed(String),
}

impl SliceOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated)
    }
}

/// Result of one refresh. Each slice is fetched and applied independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub medications: SliceOutcome,
    pub logs: SliceOutcome,
    pub stats: SliceOutcome,
    pub medications_changed: bool,
}

type CalendarKey = (u64, u64, NaiveDate, NaiveDate);

/// Owns the resident medications, logs and stats, the single undo slot and
/// the current notice.
///
/// Resident collections are only ever replaced whole, and each replacement
/// bumps a revision so calendar marks can be memoized on
/// `(medications, logs, selected date)`.
pub struct DoseController<S, P> {
    store: S,
    session: P,
    focus: NaiveDate,
    medications: Vec<Medication>,
    logs: Vec<AdherenceLog>,
    stats: AdherenceSummary,
    medications_rev: u64,
    logs_rev: u64,
    last_log_id: Option<String>,
    state: ActionState,
    notice: Option<Notice>,
    calendar: Recompute<CalendarKey, Marks>,
}

impl<S: RecordStore, P: SessionProvider> DoseController<S, P> {
    /// `focus` is the date whose calendar window bounds the fetched logs.
    pub fn new(store: S, session: P, focus: NaiveDate) -> Self {
        Self {
            store,
            session,
            focus,
            medications: Vec::new(),
            logs: Vec::new(),
            stats: AdherenceSummary::default(),
            medications_rev: 0,
            logs_rev: 0,
            last_log_id: None,
            state: ActionState::Idle,
            notice: None,
            calendar: Recompute::new(DEFAULT_RECOMPUTE_COOLDOWN),
        }
    }

    /// Seed the undo slot, e.g. from a persisted session.
    pub fn with_last_log(mut self, id: Option<String>) -> Self {
        self.last_log_id = id;
        self
    }

    pub fn with_recompute_cooldown(mut self, cooldown: Duration) -> Self {
        self.calendar = Recompute::new(cooldown);
        self
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn logs(&self) -> &[AdherenceLog] {
        &self.logs
    }

    /// Stats as reported by the record store.
    pub fn stats(&self) -> AdherenceSummary {
        self.stats
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn last_log_id(&self) -> Option<&str> {
        self.last_log_id.as_deref()
    }

    pub fn focus(&self) -> NaiveDate {
        self.focus
    }

    /// Move the log window to the calendar window around `date`. Takes effect
    /// on the next refresh.
    pub fn set_focus(&mut self, date: NaiveDate) {
        self.focus = date;
    }

    pub fn visible_notice(&self, now: NaiveDateTime) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| n.is_visible(now))
    }

    fn notify(&mut self, kind: NoticeKind, message: impl Into<String>, now: NaiveDateTime) {
        self.notice = Some(Notice {
            kind,
            message: message.into(),
            shown_at: now,
        });
    }

    fn fail(&mut self, err: CoreError, now: NaiveDateTime) -> CoreError {
        self.state = ActionState::Failed;
        self.notify(NoticeKind::Error, err.to_string(), now);
        err
    }

    /// Record a dose of `medication_id` taken now for the `date` + `time` slot.
    ///
    /// On success the new log id becomes the undo slot and resident state is
    /// refreshed. On failure nothing is retried and the slot is untouched.
    pub fn log_dose(
        &mut self,
        medication_id: &str,
        date: NaiveDate,
        time: NaiveTime,
        now: NaiveDateTime,
    ) -> CoreResult<AdherenceLog> {
        if self.session.credential().is_none() {
            return Err(self.fail(CoreError::Unauthenticated, now));
        }
        if medication_id.trim().is_empty() {
            return Err(self.fail(
                CoreError::InvalidInput("medication id is empty".into()),
                now,
            ));
        }

        self.state = ActionState::Logging;
        let request = NewLog::taken(medication_id.trim(), date, time, now);
        match self.store.create_log(&request) {
            Ok(log) => {
                tracing::info!(log = %log.id, medication = %log.medication.id, "dose logged");
                self.last_log_id = Some(log.id.clone());
                self.state = ActionState::Logged;
                self.notify(NoticeKind::Success, "Dose logged", now);
                self.refresh();
                Ok(log)
            }
            Err(e) => {
                tracing::warn!("logging dose failed: {e}");
                Err(self.fail(e, now))
            }
        }
    }

    /// Delete the last logged dose. `Ok(false)` when there is nothing to undo
    /// or no session; on failure the slot is kept so undo can be retried.
    pub fn undo_last(&mut self, now: NaiveDateTime) -> CoreResult<bool> {
        let Some(id) = self.last_log_id.clone() else {
            return Ok(false);
        };
        if self.session.credential().is_none() {
            return Ok(false);
        }

        self.state = ActionState::Undoing;
        match self.store.delete_log(&id) {
            Ok(()) => {
                tracing::info!(log = %id, "dose log undone");
                self.last_log_id = None;
                self.state = ActionState::Idle;
                self.notify(NoticeKind::Success, "Dose log removed", now);
                self.refresh();
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(log = %id, "undo failed: {e}");
                Err(self.fail(e, now))
            }
        }
    }

    /// Refetch medications, logs and stats. A failing slice keeps its previous
    /// value.
    pub fn refresh(&mut self) -> RefreshReport {
        let (start, end) = calendar::window(self.focus);

        let medications = match self.store.fetch_medications() {
            Ok(payload) => {
                let fresh = ingest::medications_from_payload(payload);
                let changed = fresh != self.medications;
                if changed {
                    self.medications = fresh;
                    self.medications_rev += 1;
                    self.calendar.invalidate();
                }
                Ok(changed)
            }
            Err(e) => Err(e),
        };
        let logs = match self.store.fetch_logs(start, end) {
            Ok(payload) => {
                self.logs = ingest::logs_from_payload(payload);
                self.logs_rev += 1;
                self.calendar.invalidate();
                SliceOutcome::Updated
            }
            Err(e) => {
                tracing::warn!("refreshing logs failed: {e}");
                SliceOutcome::Failed(e.to_string())
            }
        };
        let stats = match self.store.fetch_stats() {
            Ok(payload) => {
                self.stats = adherence::summary_from_stats(&payload);
                SliceOutcome::Updated
            }
            Err(e) => {
                tracing::warn!("refreshing stats failed: {e}");
                SliceOutcome::Failed(e.to_string())
            }
        };

        let (medications, medications_changed) = match medications {
            Ok(changed) => (SliceOutcome::Updated, changed),
            Err(e) => {
                tracing::warn!("refreshing medications failed: {e}");
                (SliceOutcome::Failed(e.to_string()), false)
            }
        };
        tracing::debug!(%start, %end, medications = self.medications.len(), logs = self.logs.len(), "refreshed");

        RefreshReport {
            medications,
            logs,
            stats,
            medications_changed,
        }
    }

    /// Day view from resident state.
    pub fn day(&self, date: NaiveDate) -> Vec<DayEntry> {
        day::doses_for_date(date, &self.medications, &self.logs)
    }

    /// Calendar marks around `selected`, memoized on the resident revisions.
    /// Marks are always computed for the requested date; a refresh that
    /// replaces medications or logs drops every memoized result.
    pub fn calendar(&mut self, selected: NaiveDate, today: NaiveDate, at: Instant) -> Marks {
        let key = (self.medications_rev, self.logs_rev, selected, today);
        let (medications, logs) = (&self.medications, &self.logs);
        self.calendar.get(key, at, |&(_, _, selected, today)| {
            calendar::marks_for_window(selected, today, medications, logs)
        })
    }

    /// Summary over the resident logs within the recent window ending `today`.
    pub fn recent_summary(&self, today: NaiveDate) -> AdherenceSummary {
        adherence::last_90_days(&self.logs, today)
    }
}
