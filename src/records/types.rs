// Core types for ingestion/sync error records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque record identifier as issued by the remote sync service
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl PartialEq<str> for RecordId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// What produced the error record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    /// Duplicate detection on an ingested row
    Duplicate,
    /// Leave / absence record
    Leave,
    /// Work report
    Report,
    /// Row coming from a bulk timesheet import
    TimesheetImport,
    /// Any kind the sync service adds later
    #[serde(other)]
    Other,
}

/// Sync outcome attached to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordStatus {
    Ok,
    Incomplete,
    Error,
    Duplicate,
}

/// Reference to the source evidence (e.g. a stored document URL)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceRef(pub String);

impl EvidenceRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Blank references are stored by the sync service as empty strings
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

/// A single ingestion/sync error record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub kind: RecordKind,
    pub status: RecordStatus,
    #[serde(default)]
    pub evidence: Option<EvidenceRef>,
    /// Short human readable description shown next to the correction form
    #[serde(default)]
    pub summary: Option<String>,
    /// Raw row data as delivered by the sync service
    #[serde(default)]
    pub details: serde_json::Value,
}

impl Record {
    pub fn new(id: impl Into<String>, kind: RecordKind, status: RecordStatus) -> Self {
        Self {
            id: RecordId::new(id),
            kind,
            status,
            evidence: None,
            summary: None,
            details: serde_json::Value::Null,
        }
    }

    pub fn with_evidence(mut self, reference: impl Into<String>) -> Self {
        self.evidence = Some(EvidenceRef::new(reference));
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Evidence reference, ignoring blank values
    pub fn evidence(&self) -> Option<&EvidenceRef> {
        self.evidence.as_ref().filter(|e| !e.is_blank())
    }

    pub fn has_evidence(&self) -> bool {
        self.evidence().is_some()
    }
}
