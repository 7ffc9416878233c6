use crate::ids::{EntryId, RecordId, SubjectScope};
use crate::state::VerificationState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One row per accepted transition: the canonical timeline of a record.
///
/// Entries are append-only and never rewritten. The checksum is computed
/// over every other field at write time; a mismatch on read means the row
/// was tampered with after commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: EntryId,
    pub record_id: RecordId,
    pub subject: SubjectScope,
    /// 0-indexed position within this record's history.
    pub sequence: u64,
    /// `None` for the first entry of a record.
    pub previous_state: Option<VerificationState>,
    pub new_state: VerificationState,
    pub reason_code: Option<String>,
    pub justification: Option<String>,
    pub actor_id: String,
    /// Authoritative server time of the commit. Ground truth.
    pub recorded_at: DateTime<Utc>,
    /// Declared business time from the caller's clock. Untrusted; kept for
    /// drift forensics and timeline consistency only.
    pub business_at: Option<DateTime<Utc>>,
    pub checksum: [u8; 32],
}

impl HistoryEntry {
    /// Build an entry and seal it with its checksum in one step.
    #[allow(clippy::too_many_arguments)]
    pub fn sealed(
        record_id: RecordId,
        subject: SubjectScope,
        sequence: u64,
        previous_state: Option<VerificationState>,
        new_state: VerificationState,
        reason_code: Option<String>,
        justification: Option<String>,
        actor_id: String,
        recorded_at: DateTime<Utc>,
        business_at: Option<DateTime<Utc>>,
    ) -> Self {
        let mut entry = Self {
            id: EntryId::new(),
            record_id,
            subject,
            sequence,
            previous_state,
            new_state,
            reason_code,
            justification,
            actor_id,
            recorded_at,
            business_at,
            checksum: [0u8; 32],
        };
        entry.checksum = entry.compute_checksum();
        entry
    }

    /// Deterministic SHA-256 over every field except the checksum itself.
    ///
    /// Each field is length-prefixed (little-endian u32) to prevent
    /// concatenation collisions; `Option` fields carry a presence tag byte.
    pub fn compute_checksum(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();

        hash_bytes(&mut hasher, self.id.as_uuid().as_bytes());
        hash_bytes(&mut hasher, self.record_id.as_uuid().as_bytes());
        hash_str(&mut hasher, &self.subject.person_id);
        hash_str(&mut hasher, &self.subject.session_id);
        hasher.update(self.sequence.to_le_bytes());

        hash_opt(&mut hasher, self.previous_state.as_ref(), |h, s| {
            hash_str(h, s.name())
        });
        hash_str(&mut hasher, self.new_state.name());
        hash_opt(&mut hasher, self.reason_code.as_deref(), hash_str);
        hash_opt(&mut hasher, self.justification.as_deref(), hash_str);
        hash_str(&mut hasher, &self.actor_id);

        hasher.update(self.recorded_at.timestamp_micros().to_le_bytes());
        hash_opt(&mut hasher, self.business_at.as_ref(), |h, t| {
            h.update(t.timestamp_micros().to_le_bytes())
        });

        hasher.finalize().into()
    }

    /// Recompute and compare. `false` means the row no longer matches what
    /// was committed.
    pub fn verify_checksum(&self) -> bool {
        self.compute_checksum() == self.checksum
    }

    /// Hex rendering of the checksum for logs and reports.
    pub fn checksum_hex(&self) -> String {
        hex::encode(self.checksum)
    }
}

fn hash_bytes(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u32).to_le_bytes());
    hasher.update(bytes);
}

fn hash_str(hasher: &mut Sha256, s: &str) {
    hash_bytes(hasher, s.as_bytes());
}

fn hash_opt<T>(hasher: &mut Sha256, value: Option<T>, f: impl FnOnce(&mut Sha256, T)) {
    match value {
        Some(v) => {
            hasher.update([1u8]);
            f(hasher, v);
        }
        None => hasher.update([0u8]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> HistoryEntry {
        HistoryEntry::sealed(
            RecordId::new(),
            SubjectScope::new("p-1", "s-1"),
            0,
            None,
            VerificationState::Verified,
            Some("MANUAL_VERIFIED".into()),
            Some("marked by staff".into()),
            "operator-1".into(),
            Utc::now(),
            None,
        )
    }

    #[test]
    fn sealed_entry_verifies() {
        assert!(entry().verify_checksum());
    }

    #[test]
    fn tampering_with_any_field_breaks_the_checksum() {
        let mut e = entry();
        e.new_state = VerificationState::Revoked;
        assert!(!e.verify_checksum());

        let mut e = entry();
        e.actor_id = "intruder".into();
        assert!(!e.verify_checksum());

        let mut e = entry();
        e.justification = None;
        assert!(!e.verify_checksum());
    }

    #[test]
    fn option_presence_is_part_of_the_digest() {
        // An empty-string justification and an absent one must hash apart;
        // the presence tag byte guarantees it.
        let a = HistoryEntry::sealed(
            RecordId::new(),
            SubjectScope::new("p", "s"),
            0,
            None,
            VerificationState::Verified,
            None,
            Some(String::new()),
            "op".into(),
            Utc::now(),
            None,
        );
        let mut b = a.clone();
        b.justification = None;
        assert_ne!(a.compute_checksum(), b.compute_checksum());
    }

    #[test]
    fn checksum_hex_is_64_chars() {
        assert_eq!(entry().checksum_hex().len(), 64);
    }
}
