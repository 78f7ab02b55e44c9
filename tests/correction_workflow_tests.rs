//! Correction workflow integration tests
//!
//! Drives the public dispatcher API the way a host screen does: start a
//! session, render the modal, report form outcomes, refresh the collection.
//!
//! Test coverage:
//! - Full pass over a mixed batch with a remote handler
//! - Retry after a failed resolution
//! - Drafts kept across back/forward navigation
//! - Background refresh making a queued record unavailable

use async_trait::async_trait;
use correction_desk::correction::{DuplicatePayload, ReportPayload};
use correction_desk::{
    CollaboratorOutcome, CorrectionDeskConfig, CorrectionKind, DispatchOutcome, ModalDispatcher,
    Record, RecordId, RecordKind, RecordStatus, ResolutionHandler, ResolutionPayload,
};
use mockall::mock;
use std::sync::{Arc, Mutex};

mock! {
    pub RemoteHandler {}

    #[async_trait]
    impl ResolutionHandler for RemoteHandler {
        async fn resolve(&self, record: &Record, payload: &ResolutionPayload) -> anyhow::Result<()>;
    }
}

/// Handler that records every applied correction and can be told to fail
#[derive(Clone, Default)]
struct RecordingHandler {
    applied: Arc<Mutex<Vec<(RecordId, CorrectionKind)>>>,
    fail_next: Arc<Mutex<bool>>,
}

#[async_trait]
impl ResolutionHandler for RecordingHandler {
    async fn resolve(&self, record: &Record, payload: &ResolutionPayload) -> anyhow::Result<()> {
        let mut fail = self.fail_next.lock().unwrap();
        if *fail {
            *fail = false;
            anyhow::bail!("remote service rejected correction");
        }
        self.applied
            .lock()
            .unwrap()
            .push((record.id.clone(), payload.kind()));
        Ok(())
    }
}

fn batch() -> Vec<Record> {
    vec![
        Record::new("dup-1", RecordKind::Duplicate, RecordStatus::Duplicate),
        Record::new("imp-1", RecordKind::TimesheetImport, RecordStatus::Error),
        Record::new("rep-1", RecordKind::Report, RecordStatus::Error)
            .with_evidence("https://files.example/rep-1.pdf"),
        Record::new("rep-2", RecordKind::Report, RecordStatus::Incomplete)
            .with_evidence("https://files.example/rep-2.pdf"),
        Record::new("lea-1", RecordKind::Leave, RecordStatus::Error),
    ]
}

fn keep(id: &str) -> ResolutionPayload {
    ResolutionPayload::Duplicate(DuplicatePayload {
        keep: RecordId::new(id),
        discard: Vec::new(),
        note: None,
    })
}

fn report(hours: f64) -> ReportPayload {
    ReportPayload {
        employee: Some("E-12".to_string()),
        project: Some("P-3".to_string()),
        work_date: chrono::NaiveDate::from_ymd_opt(2026, 9, 14),
        hours: Some(hours),
        fields: serde_json::Map::new(),
    }
}

#[tokio::test]
async fn test_full_pass_applies_each_correction_once() {
    let handler = RecordingHandler::default();
    let mut desk = ModalDispatcher::new(handler.clone(), &CorrectionDeskConfig::default());

    let first = desk.start(Some(batch())).unwrap();
    assert_eq!(first.id, RecordId::new("dup-1"));
    assert_eq!(desk.engine().queue_len(), 3);

    let outcome = desk.report(CollaboratorOutcome::Resolved(keep("dup-1"))).await.unwrap();
    assert!(matches!(outcome, DispatchOutcome::Advanced(ref r) if r.id == RecordId::new("rep-1")));
    assert_eq!(desk.view().unwrap().collaborator.kind, CorrectionKind::ErroneousReport);

    let outcome = desk
        .report(CollaboratorOutcome::Resolved(ResolutionPayload::ErroneousReport(report(8.0))))
        .await
        .unwrap();
    assert!(matches!(outcome, DispatchOutcome::Advanced(ref r) if r.id == RecordId::new("rep-2")));
    assert_eq!(desk.view().unwrap().navigation.progress_label, "case 3/3 (resolved 2)");

    let outcome = desk
        .report(CollaboratorOutcome::Resolved(ResolutionPayload::IncompleteReport(report(4.0))))
        .await
        .unwrap();
    let summary = match outcome {
        DispatchOutcome::Finished(Some(summary)) => summary,
        other => panic!("expected finished session, got {other:?}"),
    };
    assert_eq!(summary.resolved, 3);
    assert_eq!(summary.queue_len, 3);
    assert!(!desk.engine().is_active());

    let applied = handler.applied.lock().unwrap().clone();
    assert_eq!(
        applied,
        vec![
            (RecordId::new("dup-1"), CorrectionKind::Duplicate),
            (RecordId::new("rep-1"), CorrectionKind::ErroneousReport),
            (RecordId::new("rep-2"), CorrectionKind::IncompleteReport),
        ]
    );
}

#[tokio::test]
async fn test_failed_resolution_can_be_retried() {
    let handler = RecordingHandler::default();
    *handler.fail_next.lock().unwrap() = true;
    let mut desk = ModalDispatcher::new(handler.clone(), &CorrectionDeskConfig::default());
    desk.start(Some(batch()));

    let err = desk
        .report(CollaboratorOutcome::Resolved(keep("dup-1")))
        .await
        .unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(desk.engine().index(), 0);
    assert_eq!(desk.engine().resolved_count(), 0);

    let view = desk.view().unwrap();
    assert_eq!(view.collaborator.initial_payload, Some(keep("dup-1")));

    let outcome = desk.report(CollaboratorOutcome::Resolved(keep("dup-1"))).await.unwrap();
    assert!(matches!(outcome, DispatchOutcome::Advanced(_)));
    assert_eq!(desk.engine().resolved_count(), 1);
    assert_eq!(handler.applied.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_drafts_prefill_only_their_own_record() {
    let mut handler = MockRemoteHandler::new();
    handler.expect_resolve().never();
    let mut desk = ModalDispatcher::new(handler, &CorrectionDeskConfig::default());
    desk.start(Some(batch()));

    desk.next();
    let draft = ResolutionPayload::ErroneousReport(report(6.5));
    desk.report(CollaboratorOutcome::Draft(draft.clone())).await.unwrap();

    let first_key = desk.view().unwrap().collaborator.mount_key();
    desk.next();
    let view = desk.view().unwrap();
    assert_ne!(view.collaborator.mount_key(), first_key);
    assert_eq!(view.collaborator.initial_payload, None);

    desk.previous();
    let view = desk.view().unwrap();
    assert_eq!(view.collaborator.mount_key(), first_key);
    assert_eq!(view.collaborator.initial_payload, Some(draft));
}

#[tokio::test]
async fn test_refresh_mid_session_keeps_queue_stable() {
    let mut handler = MockRemoteHandler::new();
    handler.expect_resolve().times(1).returning(|_, _| Ok(()));
    let mut desk = ModalDispatcher::new(handler, &CorrectionDeskConfig::default());
    desk.start(Some(batch()));

    // A new error streams in and rep-1 gets fixed elsewhere
    let mut refreshed = batch();
    refreshed[2].status = RecordStatus::Ok;
    refreshed.insert(0, Record::new("dup-9", RecordKind::Duplicate, RecordStatus::Duplicate));
    desk.update_records(refreshed);

    assert_eq!(
        desk.engine().queue(),
        &[RecordId::new("dup-1"), RecordId::new("rep-1"), RecordId::new("rep-2")]
    );
    assert!(desk.go_to(1).is_none());
    assert_eq!(desk.engine().index(), 0);

    assert_eq!(desk.go_to(2).map(|r| r.id), Some(RecordId::new("rep-2")));
    desk.go_to(0);

    // Resolving dup-1 tries rep-1 next, which is gone: the session ends
    let outcome = desk.report(CollaboratorOutcome::Resolved(keep("dup-1"))).await.unwrap();
    assert!(matches!(outcome, DispatchOutcome::Finished(Some(ref s)) if s.resolved == 1));
    assert!(desk.view().is_none());
}

#[tokio::test]
async fn test_close_actions_never_call_the_handler() {
    let mut handler = MockRemoteHandler::new();
    handler.expect_resolve().never();
    let mut desk = ModalDispatcher::new(handler, &CorrectionDeskConfig::default());

    desk.start(Some(batch()));
    assert_eq!(
        desk.report(CollaboratorOutcome::AutoClosed).await.unwrap(),
        DispatchOutcome::Closed
    );
    assert!(desk.view().is_none());

    // Starting again without records reuses the last collection
    assert!(desk.start(None).is_some());
    assert_eq!(desk.engine().resolved_count(), 0);
    desk.stop();
    assert!(desk.view().is_none());
}
