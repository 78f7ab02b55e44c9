use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use statig::blocking::StateMachine;
use statig::prelude::*;
use uuid::Uuid;

use crate::config::ProgressConfig;
use crate::records::{Record, RecordCollection, RecordId};

use super::classifier::{build_queue, is_eligible};

#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Build a fresh queue; `None` reuses the last collection the host provided
    Start { records: Option<RecordCollection> },
    Stop,
    GoTo { index: usize },
    ConfirmCurrent,
    ConfirmAndAdvance,
    /// Host refetched its record list; only affects lookups, never the queue
    Refresh { records: RecordCollection },
}

/// How a session came to an end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionEnd {
    Stopped,
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub resolved: usize,
    pub queue_len: usize,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub ended_by: SessionEnd,
}

/// Read-only view of the engine for the host screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub active: bool,
    pub index: usize,
    pub queue_len: usize,
    pub resolved: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub progress_label: String,
    pub session_id: Option<Uuid>,
    pub started_at: Option<DateTime<Utc>>,
}

/// Shared storage of the correction session state machine.
///
/// The queue is frozen at start. `live` is only used to re-resolve queued ids,
/// so a background refresh can make a record unavailable but can never reorder,
/// grow or shrink the queue.
pub struct CorrectionSession {
    live: RecordCollection,
    queue: Vec<RecordId>,
    index: usize,
    resolved: usize,
    session_id: Option<Uuid>,
    started_at: Option<DateTime<Utc>>,
    /// Record produced by the last handled event, if any
    cursor: Option<Record>,
    last_summary: Option<SessionSummary>,
    labels: ProgressConfig,
}

impl CorrectionSession {
    pub fn new(labels: ProgressConfig) -> Self {
        Self {
            live: RecordCollection::default(),
            queue: Vec::new(),
            index: 0,
            resolved: 0,
            session_id: None,
            started_at: None,
            cursor: None,
            last_summary: None,
            labels,
        }
    }

    fn begin(&mut self, records: Option<&RecordCollection>) {
        if let Some(records) = records {
            self.live = records.clone();
        }

        // Lookups resolve a repeated id to its first row, so the queue only keeps
        // ids whose resolved row is eligible, once each
        let mut seen = HashSet::new();
        self.queue = build_queue(self.live.records())
            .into_iter()
            .filter(|id| seen.insert(id.clone()) && self.live.get(id).is_some_and(is_eligible))
            .collect();
        self.index = 0;
        self.resolved = 0;

        if self.queue.is_empty() {
            tracing::info!(
                records = self.live.len(),
                "No eligible records, correction session not started"
            );
            self.clear();
            return;
        }

        let session_id = Uuid::new_v4();
        self.session_id = Some(session_id);
        self.started_at = Some(Utc::now());
        self.cursor = self.go_to(0);
        tracing::info!(
            session_id = %session_id,
            queue_len = self.queue.len(),
            records = self.live.len(),
            "Correction session started"
        );
    }

    fn go_to(&mut self, index: usize) -> Option<Record> {
        let Some(id) = self.queue.get(index) else {
            tracing::debug!(
                index,
                queue_len = self.queue.len(),
                "Navigation ignored, index out of range"
            );
            return None;
        };

        let record = match self.live.get(id) {
            Some(record) if is_eligible(record) => record.clone(),
            Some(_) => {
                tracing::warn!(record_id = %id, index, "Queued record is no longer eligible");
                return None;
            }
            None => {
                tracing::warn!(record_id = %id, index, "Queued record no longer in collection");
                return None;
            }
        };

        self.index = index;
        tracing::debug!(
            session_id = ?self.session_id,
            record_id = %record.id,
            index,
            queue_len = self.queue.len(),
            "Moved to record"
        );
        Some(record)
    }

    fn confirm(&mut self) {
        self.resolved += 1;
        tracing::info!(
            session_id = ?self.session_id,
            record_id = %self.queue[self.index],
            resolved = self.resolved,
            "Record confirmed"
        );
    }

    fn finish(&mut self, ended_by: SessionEnd) {
        if let (Some(session_id), Some(started_at)) = (self.session_id, self.started_at) {
            let summary = SessionSummary {
                session_id,
                resolved: self.resolved,
                queue_len: self.queue.len(),
                started_at,
                ended_at: Utc::now(),
                ended_by,
            };
            tracing::info!(
                session_id = %session_id,
                resolved = summary.resolved,
                queue_len = summary.queue_len,
                ended_by = ?ended_by,
                "Correction session ended"
            );
            self.last_summary = Some(summary);
        }
        self.clear();
    }

    fn clear(&mut self) {
        self.queue.clear();
        self.index = 0;
        self.resolved = 0;
        self.session_id = None;
        self.started_at = None;
    }

    fn is_active(&self) -> bool {
        !self.queue.is_empty()
    }
}

#[state_machine(initial = "State::idle()")]
impl CorrectionSession {
    #[state]
    fn idle(&mut self, event: &SessionEvent) -> Outcome<State> {
        self.cursor = None;
        match event {
            SessionEvent::Start { records } => {
                self.begin(records.as_ref());
                if self.is_active() {
                    Transition(State::active())
                } else {
                    Handled
                }
            }
            SessionEvent::Refresh { records } => {
                self.live = records.clone();
                Handled
            }
            SessionEvent::Stop => {
                self.clear();
                Handled
            }
            _ => {
                tracing::debug!(event = ?event, "Ignoring event, no active correction session");
                Handled
            }
        }
    }

    #[state]
    fn active(&mut self, event: &SessionEvent) -> Outcome<State> {
        self.cursor = None;
        match event {
            SessionEvent::Start { records } => {
                // Restart from scratch, previous progress is dropped
                self.finish(SessionEnd::Stopped);
                self.begin(records.as_ref());
                if self.is_active() {
                    Handled
                } else {
                    Transition(State::idle())
                }
            }
            SessionEvent::Stop => {
                self.finish(SessionEnd::Stopped);
                Transition(State::idle())
            }
            SessionEvent::GoTo { index } => {
                self.cursor = self.go_to(*index);
                Handled
            }
            SessionEvent::ConfirmCurrent => {
                self.confirm();
                Handled
            }
            SessionEvent::ConfirmAndAdvance => {
                self.confirm();
                match self.go_to(self.index + 1) {
                    Some(record) => {
                        self.cursor = Some(record);
                        Handled
                    }
                    None => {
                        let ended_by = if self.index + 1 >= self.queue.len() {
                            SessionEnd::Exhausted
                        } else {
                            SessionEnd::Stopped
                        };
                        self.finish(ended_by);
                        Transition(State::idle())
                    }
                }
            }
            SessionEvent::Refresh { records } => {
                self.live = records.clone();
                Handled
            }
        }
    }
}

/// Drives one operator through the correctable subset of a record collection.
///
/// All operations are safe to call in any state: invalid navigation and calls
/// while idle are no-ops that return `None`.
pub struct SessionEngine {
    machine: StateMachine<CorrectionSession>,
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new(ProgressConfig::default())
    }
}

impl std::fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEngine")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

impl SessionEngine {
    pub fn new(labels: ProgressConfig) -> Self {
        Self {
            machine: CorrectionSession::new(labels).state_machine(),
        }
    }

    fn dispatch(&mut self, event: SessionEvent) -> Option<Record> {
        self.machine.handle(&event);
        self.machine.inner().cursor.clone()
    }

    fn session(&self) -> &CorrectionSession {
        self.machine.inner()
    }

    /// Start (or restart) a session. Returns the first queued record, or `None`
    /// when nothing in the collection is correctable.
    pub fn start(&mut self, records: Option<Vec<Record>>) -> Option<Record> {
        self.dispatch(SessionEvent::Start {
            records: records.map(RecordCollection::new),
        })
    }

    pub fn stop(&mut self) {
        self.dispatch(SessionEvent::Stop);
    }

    pub fn go_to(&mut self, index: usize) -> Option<Record> {
        self.dispatch(SessionEvent::GoTo { index })
    }

    pub fn next(&mut self) -> Option<Record> {
        if !self.is_active() {
            return None;
        }
        let index = self.index() + 1;
        self.go_to(index)
    }

    pub fn previous(&mut self) -> Option<Record> {
        if !self.is_active() {
            return None;
        }
        let index = self.index().checked_sub(1)?;
        self.go_to(index)
    }

    pub fn confirm_current(&mut self) {
        self.dispatch(SessionEvent::ConfirmCurrent);
    }

    /// Count the current record as resolved and move on. Ends the session when
    /// there is no next record.
    pub fn confirm_and_advance(&mut self) -> Option<Record> {
        self.dispatch(SessionEvent::ConfirmAndAdvance)
    }

    /// Replace the live record collection without touching the queue
    pub fn update_records(&mut self, records: Vec<Record>) {
        self.dispatch(SessionEvent::Refresh {
            records: RecordCollection::new(records),
        });
    }

    pub fn records(&self) -> &RecordCollection {
        &self.session().live
    }

    pub fn is_active(&self) -> bool {
        self.session().is_active()
    }

    pub fn index(&self) -> usize {
        self.session().index
    }

    pub fn queue_len(&self) -> usize {
        self.session().queue.len()
    }

    pub fn queue(&self) -> &[RecordId] {
        &self.session().queue
    }

    pub fn resolved_count(&self) -> usize {
        self.session().resolved
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.session().session_id
    }

    pub fn has_previous(&self) -> bool {
        self.is_active() && self.index() > 0
    }

    pub fn has_next(&self) -> bool {
        self.is_active() && self.index() + 1 < self.queue_len()
    }

    /// "case {i}/{n} (resolved {r})" while active, empty otherwise
    pub fn progress_label(&self) -> String {
        let session = self.session();
        if !session.is_active() {
            return String::new();
        }
        format!(
            "{} {}/{} ({} {})",
            session.labels.case_label,
            session.index + 1,
            session.queue.len(),
            session.labels.resolved_label,
            session.resolved
        )
    }

    /// Record at the current position, if it is still present and eligible
    pub fn current_record(&self) -> Option<Record> {
        let session = self.session();
        let id = session.queue.get(session.index)?;
        session
            .live
            .get(id)
            .filter(|record| is_eligible(record))
            .cloned()
    }

    pub fn last_summary(&self) -> Option<&SessionSummary> {
        self.session().last_summary.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let session = self.session();
        SessionSnapshot {
            active: session.is_active(),
            index: session.index,
            queue_len: session.queue.len(),
            resolved: session.resolved,
            has_previous: self.has_previous(),
            has_next: self.has_next(),
            progress_label: self.progress_label(),
            session_id: session.session_id,
            started_at: session.started_at,
        }
    }
}
