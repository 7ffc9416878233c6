use crate::error::LedgerError;
use crate::log::AppendOnlyLog;
use attest_types::{EntryId, HistoryEntry, RecordId, VerificationState};
use std::collections::HashMap;

/// Immutable history store: the canonical timeline of accepted transitions.
///
/// Entries live in one global append-only log (preserving real commit order
/// for the timeline checker) with a per-record position index on top. A
/// record's version equals its entry count, and its current state is always
/// read from the latest entry — there is no cached mutable state field to
/// go stale.
#[derive(Debug, Default)]
pub struct HistoryStore {
    log: AppendOnlyLog<HistoryEntry>,
    by_record: HashMap<RecordId, Vec<u64>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accepted entries for `record_id`. This is the version used
    /// by the optimistic concurrency check.
    pub fn version(&self, record_id: RecordId) -> u64 {
        self.by_record
            .get(&record_id)
            .map(|positions| positions.len() as u64)
            .unwrap_or(0)
    }

    /// Latest accepted entry for `record_id`, if any.
    pub fn latest(&self, record_id: RecordId) -> Option<&HistoryEntry> {
        let positions = self.by_record.get(&record_id)?;
        let last = positions.last()?;
        self.log.get(*last)
    }

    /// Current state, derived from the latest accepted entry.
    /// `None` means the record has no history yet.
    pub fn current_state(&self, record_id: RecordId) -> Option<VerificationState> {
        self.latest(record_id).map(|entry| entry.new_state)
    }

    /// Optimistic append: commits only if the record's version still equals
    /// `expected_version` (read at the start of the attempt). The entry's
    /// sequence must equal the version it lands at.
    pub fn append_if_version(
        &mut self,
        expected_version: u64,
        entry: HistoryEntry,
    ) -> Result<EntryId, LedgerError> {
        let record_id = entry.record_id;
        let actual = self.version(record_id);
        if actual != expected_version {
            return Err(LedgerError::StaleState {
                record_id,
                expected: expected_version,
                actual,
            });
        }
        debug_assert_eq!(
            entry.sequence, actual,
            "entry sequence must equal the version it commits at"
        );
        let entry_id = entry.id;
        let pos = self.log.append(entry);
        self.by_record.entry(record_id).or_default().push(pos);
        Ok(entry_id)
    }

    /// Entries for one record, oldest to newest.
    pub fn history(&self, record_id: RecordId) -> Vec<&HistoryEntry> {
        self.by_record
            .get(&record_id)
            .map(|positions| {
                positions
                    .iter()
                    .filter_map(|pos| self.log.get(*pos))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All entries across all records in real commit order.
    pub fn commit_order(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.log.iter()
    }

    /// The most recently committed entry across all records.
    pub fn last_commit(&self) -> Option<&HistoryEntry> {
        let len = self.log.len() as u64;
        len.checked_sub(1).and_then(|pos| self.log.get(pos))
    }

    /// Read-side tamper check: recompute every checksum for `record_id` and
    /// return the sequences that no longer verify.
    pub fn verify(&self, record_id: RecordId) -> Vec<u64> {
        self.history(record_id)
            .into_iter()
            .filter(|entry| !entry.verify_checksum())
            .map(|entry| entry.sequence)
            .collect()
    }
}
