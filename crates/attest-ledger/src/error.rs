use attest_types::{DedupKey, RecordId};

/// Errors produced by ledger commit paths.
///
/// Both variants are expected concurrency outcomes, not faults: the engine
/// converts them into first-class rejection rows.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The record gained another entry between read and attempted write.
    #[error("record {record_id} moved from version {expected} to {actual}")]
    StaleState {
        record_id: RecordId,
        expected: u64,
        actual: u64,
    },
    /// The dedup key was already registered for another record.
    #[error("dedup key {key} already registered for record {existing}")]
    AlreadyRegistered { key: DedupKey, existing: RecordId },
}
