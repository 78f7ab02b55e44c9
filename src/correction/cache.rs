// Per-record store of the last payload a correction form reported

use std::collections::HashMap;

use crate::records::RecordId;

use super::types::{CorrectionKind, ResolutionPayload};

/// Keeps in-progress corrections alive while the operator moves back and
/// forth through the queue. Lives as long as the host screen; no eviction.
#[derive(Debug, Clone, Default)]
pub struct PayloadCache {
    entries: HashMap<RecordId, ResolutionPayload>,
}

impl PayloadCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &RecordId) -> Option<&ResolutionPayload> {
        self.entries.get(id)
    }

    /// Cached payload for `id`, only if it was produced by the same kind of form
    pub fn get_for(&self, id: &RecordId, kind: CorrectionKind) -> Option<&ResolutionPayload> {
        self.get(id).filter(|payload| payload.kind() == kind)
    }

    pub fn set(&mut self, id: RecordId, payload: ResolutionPayload) {
        tracing::debug!(record_id = %id, kind = %payload.kind(), "Cached correction payload");
        self.entries.insert(id, payload);
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            tracing::debug!(entries = self.entries.len(), "Discarding correction payload cache");
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::types::{DuplicatePayload, ReportPayload};

    fn duplicate(keep: &str) -> ResolutionPayload {
        ResolutionPayload::Duplicate(DuplicatePayload {
            keep: RecordId::new(keep),
            discard: Vec::new(),
            note: None,
        })
    }

    #[test]
    fn test_last_write_wins() {
        let mut cache = PayloadCache::new();
        let id = RecordId::new("a");
        cache.set(id.clone(), duplicate("a"));
        cache.set(id.clone(), duplicate("b"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&id), Some(&duplicate("b")));
        assert!(cache.get(&RecordId::new("other")).is_none());
    }

    #[test]
    fn test_get_for_filters_by_kind() {
        let mut cache = PayloadCache::new();
        let id = RecordId::new("r");
        cache.set(
            id.clone(),
            ResolutionPayload::IncompleteReport(ReportPayload {
                employee: None,
                project: Some("P-1".to_string()),
                work_date: None,
                hours: None,
                fields: serde_json::Map::new(),
            }),
        );

        assert!(cache.get_for(&id, CorrectionKind::IncompleteReport).is_some());
        assert!(cache.get_for(&id, CorrectionKind::ErroneousReport).is_none());
    }

    #[test]
    fn test_clear_empties_cache() {
        let mut cache = PayloadCache::new();
        cache.set(RecordId::new("a"), duplicate("a"));
        cache.clear();
        assert!(cache.is_empty());
    }
}
