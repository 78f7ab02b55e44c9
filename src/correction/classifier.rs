// Eligibility classifier - decides which records the operator can correct one by one

use crate::records::{Record, RecordId, RecordKind, RecordStatus};

use super::types::{Classification, CorrectionKind, IneligibleReason};

/// Classify a record. Rules are checked in precedence order, first match wins:
/// bulk imports are never eligible, duplicates always are, and leave/report
/// errors need their source evidence to be correctable.
pub fn classify(record: &Record) -> Classification {
    use Classification::{Eligible, Ineligible};

    match (record.kind, record.status, record.has_evidence()) {
        (RecordKind::TimesheetImport, _, _) => Ineligible {
            reason: IneligibleReason::BulkImport,
        },
        (_, RecordStatus::Duplicate, _) => Eligible {
            kind: CorrectionKind::Duplicate,
        },
        (RecordKind::Leave, RecordStatus::Error, true) => Eligible {
            kind: CorrectionKind::Leave,
        },
        (RecordKind::Report, RecordStatus::Incomplete, true) => Eligible {
            kind: CorrectionKind::IncompleteReport,
        },
        (RecordKind::Report, RecordStatus::Error, true) => Eligible {
            kind: CorrectionKind::ErroneousReport,
        },
        (RecordKind::Leave, RecordStatus::Error, false)
        | (RecordKind::Report, RecordStatus::Incomplete | RecordStatus::Error, false) => {
            Ineligible {
                reason: IneligibleReason::MissingEvidence,
            }
        }
        _ => Ineligible {
            reason: IneligibleReason::NotCorrectable,
        },
    }
}

pub fn is_eligible(record: &Record) -> bool {
    classify(record).is_eligible()
}

/// Correction form to mount for a record, if any
pub fn resolve_ui_kind(record: &Record) -> Option<CorrectionKind> {
    classify(record).correction_kind()
}

/// Ids of the eligible records, in input order
pub fn build_queue(records: &[Record]) -> Vec<RecordId> {
    records
        .iter()
        .filter(|record| {
            let classification = classify(record);
            if let Some(reason) = classification.ineligible_reason() {
                tracing::trace!(record_id = %record.id, reason = ?reason, "Record left out of correction queue");
            }
            classification.is_eligible()
        })
        .map(|record| record.id.clone())
        .collect()
}
