use crate::error::LedgerError;
use attest_types::{DedupKey, RecordId};
use std::collections::HashMap;

/// Maps a caller-supplied dedup key to the record it already produced.
///
/// A key registers exactly once; the second registration surfaces the
/// existing record id so the caller can treat the operation as already
/// processed. Registration happens inside the same critical section as the
/// first history append, so two concurrent submitters of one key cannot
/// both believe they created the record.
#[derive(Debug, Default)]
pub struct IdempotencyLedger {
    keys: HashMap<DedupKey, RecordId>,
}

impl IdempotencyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// The record a key already produced, if any.
    pub fn check(&self, key: &DedupKey) -> Option<RecordId> {
        self.keys.get(key).copied()
    }

    /// Register a key exactly once. First writer wins; a repeat returns the
    /// original record id in the error.
    pub fn register(&mut self, key: DedupKey, record_id: RecordId) -> Result<(), LedgerError> {
        if let Some(existing) = self.keys.get(&key) {
            return Err(LedgerError::AlreadyRegistered {
                key,
                existing: *existing,
            });
        }
        self.keys.insert(key, record_id);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
