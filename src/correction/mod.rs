// Assisted-correction workflow
//
// Walks an operator through the correctable subset of ingestion/sync error
// records one at a time, mounting the matching correction form for each.

pub mod types;
pub mod classifier;
pub mod session;
pub mod cache;
pub mod errors;
pub mod traits;
pub mod dispatcher;


pub use types::{
    Classification, CollaboratorOutcome, CorrectionKind, DuplicatePayload, IneligibleReason,
    LeavePayload, ReportPayload, ResolutionPayload,
};
pub use classifier::{build_queue, classify, is_eligible, resolve_ui_kind};
pub use session::{SessionEnd, SessionEngine, SessionEvent, SessionSnapshot, SessionSummary};
pub use cache::PayloadCache;
pub use errors::CorrectionError;
pub use traits::ResolutionHandler;
pub use dispatcher::{
    CollaboratorMount, DispatchOutcome, ModalDispatcher, ModalView, MountKey, NavigationControls,
};
