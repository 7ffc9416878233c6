use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::EngineError;
use attest_ledger::{
    AppendOnlyLog, AttemptLedger, DriftAnalyzer, DuplicatePattern, HistoryStore,
    IdempotencyLedger, ReasonCodeRegistry, ScopeFilter, TimelineChecker, TransitionRules,
    TransitionSpec, find_drift_anomalies, find_duplicate_patterns,
};
use attest_types::{
    Actor, AttemptId, AttemptOutcome, ClockDriftObservation, DedupKey, DriftSeverity, EntryId,
    HistoryEntry, IntegrityFlag, RecordId, RejectionReason, SubjectScope, TransitionAttempt,
    VerificationState,
};
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// One request to move a record's verification state.
#[derive(Clone, Debug)]
pub struct TransitionRequest {
    pub record_id: RecordId,
    pub subject: SubjectScope,
    pub requested_state: VerificationState,
    pub reason_code: Option<String>,
    pub justification: Option<String>,
    pub actor: Actor,
    /// Caller-reported event time. Untrusted; drift-checked and stored as
    /// the declared business timestamp only.
    pub client_timestamp: Option<DateTime<Utc>>,
    pub dedup: Option<DedupKey>,
}

impl TransitionRequest {
    pub fn new(
        record_id: RecordId,
        subject: SubjectScope,
        requested_state: VerificationState,
        actor: Actor,
    ) -> Self {
        Self {
            record_id,
            subject,
            requested_state,
            reason_code: None,
            justification: None,
            actor,
            client_timestamp: None,
            dedup: None,
        }
    }

    pub fn with_reason(mut self, code: impl Into<String>) -> Self {
        self.reason_code = Some(code.into());
        self
    }

    pub fn with_justification(mut self, text: impl Into<String>) -> Self {
        self.justification = Some(text.into());
        self
    }

    pub fn with_client_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.client_timestamp = Some(at);
        self
    }

    pub fn with_dedup(mut self, key: DedupKey) -> Self {
        self.dedup = Some(key);
        self
    }
}

/// Outcome of one transition attempt. Every variant corresponds to a
/// durably recorded row; nothing is silently dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionResult {
    Accepted { entry_id: EntryId },
    /// The dedup key was already processed; the original record stands and
    /// the repeat was ledgered as a `DUPLICATE_REQUEST` rejection.
    AlreadyProcessed { record_id: RecordId },
    Rejected { reason: RejectionReason },
}

/// The atomic commit unit: a history append and its idempotency key
/// registration succeed or fail together under one guard.
#[derive(Debug, Default)]
struct CommitUnit {
    history: HistoryStore,
    idempotency: IdempotencyLedger,
}

/// The attendance integrity engine.
///
/// Locking layout: `core` guards the read-validate-commit critical section
/// (history plus idempotency); the attempt ledger, drift log, and flag log
/// have independent locks so a rejection or observation is recorded even
/// when the main transaction never ran.
pub struct IntegrityEngine {
    config: EngineConfig,
    registry: ReasonCodeRegistry,
    rules: TransitionRules,
    analyzer: DriftAnalyzer,
    timeline: TimelineChecker,
    clock: Box<dyn Clock>,
    core: Mutex<CommitUnit>,
    attempts: Mutex<AttemptLedger>,
    drift_log: Mutex<AppendOnlyLog<ClockDriftObservation>>,
    flags: Mutex<AppendOnlyLog<IntegrityFlag>>,
}

impl IntegrityEngine {
    pub fn new(config: EngineConfig, registry: ReasonCodeRegistry, clock: Box<dyn Clock>) -> Self {
        Self {
            analyzer: DriftAnalyzer::new(config.drift),
            config,
            registry,
            rules: TransitionRules::new(),
            timeline: TimelineChecker::new(),
            clock,
            core: Mutex::new(CommitUnit::default()),
            attempts: Mutex::new(AttemptLedger::new()),
            drift_log: Mutex::new(AppendOnlyLog::new()),
            flags: Mutex::new(AppendOnlyLog::new()),
        }
    }

    /// Default configuration, default catalog, system clock.
    pub fn with_defaults() -> Self {
        Self::new(
            EngineConfig::default(),
            ReasonCodeRegistry::with_default_catalog(),
            Box::new(crate::clock::SystemClock),
        )
    }

    /// Attempt one state transition. Terminates in an accepted history
    /// entry or a rejected attempt row — both durably recorded — or a
    /// storage fault with nothing persisted.
    pub fn attempt_transition(
        &self,
        request: TransitionRequest,
    ) -> Result<TransitionResult, EngineError> {
        let attempt_id = AttemptId::new();
        let now = self.clock.now();

        // One read: dedup presence, version, and current state together.
        let (already_processed, version, current_state) = {
            let core = self.lock_core()?;
            let existing = request
                .dedup
                .as_ref()
                .and_then(|key| core.idempotency.check(key));
            (
                existing,
                core.history.version(request.record_id),
                core.history.current_state(request.record_id),
            )
        };

        if let Some(existing) = already_processed {
            return self.settle_duplicate(attempt_id, &request, current_state, existing, now);
        }

        if let Some(client_at) = request.client_timestamp {
            let observation = self.analyzer.evaluate(
                attempt_id,
                request.record_id,
                request.subject.clone(),
                client_at,
                now,
            );
            debug!(
                record = %request.record_id,
                drift_secs = observation.drift_secs,
                severity = %observation.severity,
                "clock drift observed"
            );
            let blocked = self.analyzer.blocks(&observation);
            let drift_secs = observation.drift_secs;
            self.lock(&self.drift_log)?.append(observation);
            if blocked {
                return self.settle_rejection(
                    attempt_id,
                    &request,
                    current_state,
                    RejectionReason::ClockDriftBlocked { drift_secs },
                    now,
                );
            }
        }

        let spec = TransitionSpec {
            current_state,
            requested_state: request.requested_state,
            reason_code: request.reason_code.as_deref(),
            justification: request.justification.as_deref(),
            actor: &request.actor,
        };
        if let Err(reason) = spec.validate(&self.rules, &self.registry) {
            return self.settle_rejection(attempt_id, &request, current_state, reason, now);
        }

        // Commit: optimistic version check and idempotency registration
        // under one guard.
        let (entry_id, timeline_flags) = {
            let mut core = self.lock_core()?;

            // A concurrent winner may have registered the key since the
            // first read; the duplicate outcome takes precedence over the
            // version check it would otherwise fail.
            if let Some(key) = request.dedup.as_ref() {
                if let Some(existing) = core.idempotency.check(key) {
                    drop(core);
                    return self.settle_duplicate(
                        attempt_id,
                        &request,
                        current_state,
                        existing,
                        now,
                    );
                }
            }

            let entry = HistoryEntry::sealed(
                request.record_id,
                request.subject.clone(),
                version,
                current_state,
                request.requested_state,
                request.reason_code.clone(),
                request.justification.clone(),
                request.actor.id.clone(),
                now,
                request.client_timestamp,
            );
            let timeline_flags = self
                .timeline
                .check_commit(core.history.commit_order(), &entry, now);

            match core.history.append_if_version(version, entry) {
                Ok(entry_id) => {
                    if let Some(key) = request.dedup.clone() {
                        // Absent under this same guard a moment ago.
                        let _ = core.idempotency.register(key, request.record_id);
                    }
                    (entry_id, timeline_flags)
                }
                Err(_) => {
                    drop(core);
                    return self.settle_rejection(
                        attempt_id,
                        &request,
                        current_state,
                        RejectionReason::StaleState,
                        now,
                    );
                }
            }
        };

        self.record_attempt(attempt_id, &request, current_state, None, now)?;
        for flag in timeline_flags {
            warn!(
                subject = %flag.subject,
                earlier = %flag.earlier_entry,
                later = %flag.later_entry,
                "timeline inconsistency detected"
            );
            self.lock(&self.flags)?.append(flag);
        }
        info!(
            record = %request.record_id,
            state = %request.requested_state,
            actor = %request.actor.id,
            "transition accepted"
        );
        Ok(TransitionResult::Accepted { entry_id })
    }

    /// Accepted entries for a record, oldest to newest.
    pub fn get_history(&self, record_id: RecordId) -> Result<Vec<HistoryEntry>, EngineError> {
        let core = self.lock_core()?;
        Ok(core
            .history
            .history(record_id)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Every attempt for a record, rejections included, oldest to newest.
    pub fn get_attempts(&self, record_id: RecordId) -> Result<Vec<TransitionAttempt>, EngineError> {
        let attempts = self.lock(&self.attempts)?;
        Ok(attempts
            .attempts_for(record_id)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Current state derived from the latest accepted entry.
    pub fn get_current_state(
        &self,
        record_id: RecordId,
    ) -> Result<Option<VerificationState>, EngineError> {
        Ok(self.lock_core()?.history.current_state(record_id))
    }

    /// Sequences whose checksums no longer verify. Empty means untampered.
    pub fn verify_history(&self, record_id: RecordId) -> Result<Vec<u64>, EngineError> {
        Ok(self.lock_core()?.history.verify(record_id))
    }

    /// Flags written by the timeline consistency checker, oldest first.
    pub fn get_integrity_flags(&self) -> Result<Vec<IntegrityFlag>, EngineError> {
        Ok(self.lock(&self.flags)?.iter().cloned().collect())
    }

    /// Subjects with more than one accepted entry inside the configured
    /// duplicate window.
    pub fn find_duplicate_patterns(
        &self,
        filter: &ScopeFilter,
    ) -> Result<Vec<DuplicatePattern>, EngineError> {
        let core = self.lock_core()?;
        Ok(find_duplicate_patterns(
            core.history.commit_order(),
            filter,
            self.config.duplicate_window(),
        ))
    }

    /// Drift observations at or above `min_severity` within the scope.
    pub fn find_drift_anomalies(
        &self,
        filter: &ScopeFilter,
        min_severity: DriftSeverity,
    ) -> Result<Vec<ClockDriftObservation>, EngineError> {
        let drift_log = self.lock(&self.drift_log)?;
        Ok(find_drift_anomalies(drift_log.iter(), filter, min_severity)
            .into_iter()
            .cloned()
            .collect())
    }

    fn lock_core(&self) -> Result<MutexGuard<'_, CommitUnit>, EngineError> {
        self.core
            .lock()
            .map_err(|_| EngineError::StorageUnavailable("commit unit lock poisoned"))
    }

    fn lock<'a, T>(&self, mutex: &'a Mutex<T>) -> Result<MutexGuard<'a, T>, EngineError> {
        mutex
            .lock()
            .map_err(|_| EngineError::StorageUnavailable("ledger lock poisoned"))
    }

    /// Durably record a rejection and hand the reason back as data.
    fn settle_rejection(
        &self,
        attempt_id: AttemptId,
        request: &TransitionRequest,
        current_state: Option<VerificationState>,
        reason: RejectionReason,
        now: DateTime<Utc>,
    ) -> Result<TransitionResult, EngineError> {
        warn!(
            record = %request.record_id,
            requested = %request.requested_state,
            detail = reason.detail(),
            "transition rejected"
        );
        self.record_attempt(attempt_id, request, current_state, Some(reason.clone()), now)?;
        Ok(TransitionResult::Rejected { reason })
    }

    /// A repeated dedup key: ledger the rejection for forensic
    /// completeness, then report the operation as already completed.
    fn settle_duplicate(
        &self,
        attempt_id: AttemptId,
        request: &TransitionRequest,
        current_state: Option<VerificationState>,
        existing: RecordId,
        now: DateTime<Utc>,
    ) -> Result<TransitionResult, EngineError> {
        warn!(
            record = %request.record_id,
            existing = %existing,
            "duplicate submission deduplicated"
        );
        self.record_attempt(
            attempt_id,
            request,
            current_state,
            Some(RejectionReason::DuplicateRequest { existing }),
            now,
        )?;
        Ok(TransitionResult::AlreadyProcessed { record_id: existing })
    }

    fn record_attempt(
        &self,
        attempt_id: AttemptId,
        request: &TransitionRequest,
        current_state: Option<VerificationState>,
        rejection: Option<RejectionReason>,
        now: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        let outcome = if rejection.is_some() {
            AttemptOutcome::Rejected
        } else {
            AttemptOutcome::Accepted
        };
        self.lock(&self.attempts)?.record(TransitionAttempt {
            id: attempt_id,
            record_id: request.record_id,
            current_state,
            requested_state: request.requested_state,
            reason_code: request.reason_code.clone(),
            justification: request.justification.clone(),
            actor_id: request.actor.id.clone(),
            actor_origin: request.actor.origin.clone(),
            outcome,
            rejection,
            requested_at: now,
        });
        Ok(())
    }
}
