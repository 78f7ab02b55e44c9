// Ordered, id-indexed snapshot of the host's record list

use std::collections::HashMap;

use super::types::{Record, RecordId};

/// Snapshot of the record collection as last supplied by the host.
///
/// Keeps the input order and an id index so the session engine can re-resolve
/// queued ids against the latest data without scanning.
#[derive(Debug, Clone, Default)]
pub struct RecordCollection {
    records: Vec<Record>,
    index: HashMap<RecordId, usize>,
}

impl RecordCollection {
    pub fn new(records: Vec<Record>) -> Self {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            // First occurrence wins when the host sends duplicate ids
            index.entry(record.id.clone()).or_insert(position);
        }
        Self { records, index }
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record ids in input order
    pub fn ids(&self) -> Vec<RecordId> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }
}

impl From<Vec<Record>> for RecordCollection {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}
