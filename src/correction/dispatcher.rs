// Modal dispatcher - picks the correction form for the current record and routes its outcome

use serde::Serialize;
use tracing::Instrument;

use crate::config::CorrectionDeskConfig;
use crate::records::{EvidenceRef, Record, RecordId};
use crate::telemetry::session_span;

use super::cache::PayloadCache;
use super::classifier::resolve_ui_kind;
use super::errors::CorrectionError;
use super::session::{SessionEngine, SessionSummary};
use super::traits::ResolutionHandler;
use super::types::{CollaboratorOutcome, CorrectionKind, ResolutionPayload};

/// Previous/next/close surface shown above every correction form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationControls {
    pub has_previous: bool,
    pub has_next: bool,
    pub progress_label: String,
}

/// Identity of a mounted correction form. The host must remount the form
/// whenever this changes so form state never carries over between records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MountKey {
    pub kind: CorrectionKind,
    pub record_id: RecordId,
}

/// Everything a correction form needs to render itself
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollaboratorMount {
    pub kind: CorrectionKind,
    pub record: Record,
    pub evidence: Option<EvidenceRef>,
    /// Last payload cached for this record, used to prefill the form
    pub initial_payload: Option<ResolutionPayload>,
}

impl CollaboratorMount {
    pub fn mount_key(&self) -> MountKey {
        MountKey {
            kind: self.kind,
            record_id: self.record.id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModalView {
    pub navigation: NavigationControls,
    pub collaborator: CollaboratorMount,
}

/// What happened after a correction form reported back
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Payload stored for prefill, session unchanged
    Cached,
    /// Correction applied, moved to the next record
    Advanced(Record),
    /// Correction applied and nothing left in the queue
    Finished(Option<SessionSummary>),
    /// Form closed without resolving, session stopped
    Closed,
}

/// Composes the session engine and the payload cache behind the modal the
/// operator works in.
pub struct ModalDispatcher<H> {
    engine: SessionEngine,
    cache: PayloadCache,
    handler: H,
    reset_cache_on_new_collection: bool,
    /// Record ids of the collection the last session started on
    session_collection: Option<Vec<RecordId>>,
}

impl<H: ResolutionHandler> ModalDispatcher<H> {
    pub fn new(handler: H, config: &CorrectionDeskConfig) -> Self {
        Self {
            engine: SessionEngine::new(config.progress.clone()),
            cache: PayloadCache::new(),
            handler,
            reset_cache_on_new_collection: config.cache.reset_on_new_collection,
            session_collection: None,
        }
    }

    pub fn engine(&self) -> &SessionEngine {
        &self.engine
    }

    pub fn cache(&self) -> &PayloadCache {
        &self.cache
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Host pushed a refreshed record collection
    pub fn update_records(&mut self, records: Vec<Record>) {
        self.engine.update_records(records);
    }

    /// Start a session. Cached payloads are dropped when the session runs on a
    /// different record collection than the previous session did.
    pub fn start(&mut self, records: Option<Vec<Record>>) -> Option<Record> {
        let ids: Vec<RecordId> = match &records {
            Some(records) => records.iter().map(|r| r.id.clone()).collect(),
            None => self.engine.records().ids(),
        };
        let new_collection = self
            .session_collection
            .as_ref()
            .is_some_and(|previous| *previous != ids);
        if self.reset_cache_on_new_collection && new_collection {
            self.cache.clear();
        }
        self.session_collection = Some(ids);
        self.engine.start(records)
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    pub fn next(&mut self) -> Option<Record> {
        self.engine.next()
    }

    pub fn previous(&mut self) -> Option<Record> {
        self.engine.previous()
    }

    pub fn go_to(&mut self, index: usize) -> Option<Record> {
        self.engine.go_to(index)
    }

    pub fn resolve_ui_kind(&self, record: &Record) -> Option<CorrectionKind> {
        resolve_ui_kind(record)
    }

    /// The modal to render, or `None` when there is no session or the current
    /// record is no longer available.
    pub fn view(&self) -> Option<ModalView> {
        if !self.engine.is_active() {
            return None;
        }
        let record = self.engine.current_record()?;
        let kind = resolve_ui_kind(&record)?;

        let navigation = NavigationControls {
            has_previous: self.engine.has_previous(),
            has_next: self.engine.has_next(),
            progress_label: self.engine.progress_label(),
        };

        let collaborator = CollaboratorMount {
            kind,
            evidence: record.evidence().cloned(),
            initial_payload: self.cache.get_for(&record.id, kind).cloned(),
            record,
        };

        Some(ModalView {
            navigation,
            collaborator,
        })
    }

    /// Route a correction form's outcome.
    ///
    /// `Resolved` is applied through the resolution handler; only on success
    /// does the session count the record and advance. A failure leaves the
    /// session exactly where it was, with the payload kept for a retry.
    pub async fn report(
        &mut self,
        outcome: CollaboratorOutcome,
    ) -> Result<DispatchOutcome, CorrectionError> {
        match outcome {
            CollaboratorOutcome::Cancelled | CollaboratorOutcome::AutoClosed => {
                tracing::info!(outcome = ?outcome, "Correction form closed without resolution");
                self.engine.stop();
                Ok(DispatchOutcome::Closed)
            }
            CollaboratorOutcome::Draft(payload) => {
                let record = self.checked_current(&payload)?;
                self.cache.set(record.id, payload);
                Ok(DispatchOutcome::Cached)
            }
            CollaboratorOutcome::Resolved(payload) => {
                let record = self.checked_current(&payload)?;
                self.cache.set(record.id.clone(), payload.clone());

                let span = session_span(self.engine.session_id(), self.engine.queue_len());
                let result = self
                    .handler
                    .resolve(&record, &payload)
                    .instrument(span)
                    .await;
                if let Err(source) = result {
                    tracing::warn!(
                        record_id = %record.id,
                        kind = %payload.kind(),
                        error = %source,
                        "Resolution failed, session left in place"
                    );
                    return Err(CorrectionError::Resolution {
                        record_id: record.id,
                        kind: payload.kind(),
                        source,
                    });
                }

                match self.engine.confirm_and_advance() {
                    Some(next) => Ok(DispatchOutcome::Advanced(next)),
                    None => Ok(DispatchOutcome::Finished(self.engine.last_summary().cloned())),
                }
            }
        }
    }

    fn checked_current(&self, payload: &ResolutionPayload) -> Result<Record, CorrectionError> {
        let record = self
            .engine
            .current_record()
            .ok_or(CorrectionError::NoCurrentRecord)?;
        let expected = resolve_ui_kind(&record).ok_or(CorrectionError::NoCurrentRecord)?;
        if payload.kind() != expected {
            return Err(CorrectionError::KindMismatch {
                record_id: record.id,
                expected,
                actual: payload.kind(),
            });
        }
        Ok(record)
    }
}
