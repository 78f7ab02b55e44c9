use thiserror::Error;

use crate::records::RecordId;

use super::types::CorrectionKind;

#[derive(Debug, Error)]
pub enum CorrectionError {
    #[error("No record is currently open for correction")]
    NoCurrentRecord,
    #[error("Payload for {actual} submitted to the {expected} form of record {record_id}")]
    KindMismatch {
        record_id: RecordId,
        expected: CorrectionKind,
        actual: CorrectionKind,
    },
    #[error("Resolving {kind} record {record_id} failed: {source}")]
    Resolution {
        record_id: RecordId,
        kind: CorrectionKind,
        #[source]
        source: anyhow::Error,
    },
}

impl CorrectionError {
    /// Resolution failures leave the session in place and can be retried as-is
    pub fn is_retryable(&self) -> bool {
        matches!(self, CorrectionError::Resolution { .. })
    }
}
