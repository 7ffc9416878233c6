use crate::log::AppendOnlyLog;
use attest_types::{RecordId, TransitionAttempt};

/// Append-only record of every attempted transition, accepted or rejected.
///
/// Writes here are independent of the main commit transaction: a rejection
/// is recorded durably even when the validation it documents failed before
/// any state was touched.
#[derive(Debug, Default)]
pub struct AttemptLedger {
    log: AppendOnlyLog<TransitionAttempt>,
}

impl AttemptLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one attempt. Returns its permanent position.
    pub fn record(&mut self, attempt: TransitionAttempt) -> u64 {
        self.log.append(attempt)
    }

    /// Attempts for one record, oldest to newest, rejections included.
    pub fn attempts_for(&self, record_id: RecordId) -> Vec<&TransitionAttempt> {
        self.log
            .iter()
            .filter(|attempt| attempt.record_id == record_id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_types::{AttemptId, AttemptOutcome, RejectionReason, VerificationState};
    use chrono::Utc;

    fn attempt(record_id: RecordId, outcome: AttemptOutcome) -> TransitionAttempt {
        let rejection = match outcome {
            AttemptOutcome::Accepted => None,
            AttemptOutcome::Rejected => Some(RejectionReason::StaleState),
        };
        TransitionAttempt {
            id: AttemptId::new(),
            record_id,
            current_state: None,
            requested_state: VerificationState::Verified,
            reason_code: None,
            justification: None,
            actor_id: "op".into(),
            actor_origin: None,
            outcome,
            rejection,
            requested_at: Utc::now(),
        }
    }

    #[test]
    fn rejections_and_acceptances_share_one_ledger() {
        let mut ledger = AttemptLedger::new();
        let record = RecordId::new();
        ledger.record(attempt(record, AttemptOutcome::Rejected));
        ledger.record(attempt(record, AttemptOutcome::Accepted));
        ledger.record(attempt(RecordId::new(), AttemptOutcome::Accepted));

        let rows = ledger.attempts_for(record);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].outcome, AttemptOutcome::Rejected);
        assert_eq!(rows[1].outcome, AttemptOutcome::Accepted);
        assert_eq!(ledger.len(), 3);
    }
}
