// Record data model - read-only view of ingestion/sync error rows
// The correction workflow never mutates these; it only classifies and displays them.

pub mod types;
pub mod collection;

pub use types::{EvidenceRef, Record, RecordId, RecordKind, RecordStatus};
pub use collection::RecordCollection;
