// Core types for the assisted-correction workflow

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::records::RecordId;

/// Which specialised correction form a record needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrectionKind {
    Duplicate,
    Leave,
    IncompleteReport,
    ErroneousReport,
}

impl CorrectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CorrectionKind::Duplicate => "duplicate",
            CorrectionKind::Leave => "leave",
            CorrectionKind::IncompleteReport => "incomplete-report",
            CorrectionKind::ErroneousReport => "erroneous-report",
        }
    }
}

impl fmt::Display for CorrectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a record is left out of the correction queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IneligibleReason {
    /// Bulk import rows are fixed by re-importing
    BulkImport,
    /// Leave/report error without the source document to show next to the form
    MissingEvidence,
    /// Nothing to correct for this kind/status combination
    NotCorrectable,
}

/// Result of classifying a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "eligibility", rename_all = "kebab-case")]
pub enum Classification {
    Eligible { kind: CorrectionKind },
    Ineligible { reason: IneligibleReason },
}

impl Classification {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Classification::Eligible { .. })
    }

    pub fn correction_kind(&self) -> Option<CorrectionKind> {
        match self {
            Classification::Eligible { kind } => Some(*kind),
            Classification::Ineligible { .. } => None,
        }
    }

    pub fn ineligible_reason(&self) -> Option<IneligibleReason> {
        match self {
            Classification::Eligible { .. } => None,
            Classification::Ineligible { reason } => Some(*reason),
        }
    }
}

/// Duplicate resolution: which of the colliding rows survives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicatePayload {
    pub keep: RecordId,
    #[serde(default)]
    pub discard: Vec<RecordId>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Corrected leave fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeavePayload {
    pub employee: String,
    pub leave_type: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
}

/// Corrected work report fields, shared by incomplete and erroneous reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    #[serde(default)]
    pub employee: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub work_date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub hours: Option<f64>,
    #[serde(default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

/// Payload produced by a correction form, one variant per correction kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "kebab-case")]
pub enum ResolutionPayload {
    Duplicate(DuplicatePayload),
    Leave(LeavePayload),
    IncompleteReport(ReportPayload),
    ErroneousReport(ReportPayload),
}

impl ResolutionPayload {
    pub fn kind(&self) -> CorrectionKind {
        match self {
            ResolutionPayload::Duplicate(_) => CorrectionKind::Duplicate,
            ResolutionPayload::Leave(_) => CorrectionKind::Leave,
            ResolutionPayload::IncompleteReport(_) => CorrectionKind::IncompleteReport,
            ResolutionPayload::ErroneousReport(_) => CorrectionKind::ErroneousReport,
        }
    }
}

/// What a mounted correction form reports back to the dispatcher
#[derive(Debug, Clone, PartialEq)]
pub enum CollaboratorOutcome {
    /// Partial input or data loaded for the form; cached, session unchanged
    Draft(ResolutionPayload),
    /// Operator submitted the correction
    Resolved(ResolutionPayload),
    /// Operator closed the form
    Cancelled,
    /// The form decided nothing needs to be done and closed itself
    AutoClosed,
}
