// Correction Desk Library - assisted correction of ingestion/sync error records
// This exposes the core components for host screens and integration tests

pub mod records;
pub mod correction;
pub mod config;
pub mod telemetry;

// Re-export key types for easy access
pub use records::{EvidenceRef, Record, RecordCollection, RecordId, RecordKind, RecordStatus};
pub use correction::{
    build_queue, classify, resolve_ui_kind, Classification, CollaboratorMount, CollaboratorOutcome,
    CorrectionError, CorrectionKind, DispatchOutcome, IneligibleReason, ModalDispatcher, ModalView,
    PayloadCache, ResolutionHandler, ResolutionPayload, SessionEngine, SessionSnapshot,
    SessionSummary,
};
pub use crate::config::{config, CorrectionDeskConfig};
pub use telemetry::{init_telemetry, session_span};
