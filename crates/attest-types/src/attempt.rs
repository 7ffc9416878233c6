use crate::ids::{AttemptId, RecordId};
use crate::state::VerificationState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal outcome of one transition attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptOutcome {
    Accepted,
    Rejected,
}

/// Why a transition attempt was rejected.
///
/// Every variant maps to a stable detail string recorded in the attempt
/// ledger. Rejections are first-class, durably recorded outcomes — not
/// errors. Validation variants are caller-correctable; `StaleState` is
/// transient and retryable; `DuplicateRequest` and `ClockDriftBlocked` are
/// deliberate protective rejections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    /// The `(from, to)` pair is not in the transition allow-list.
    InvalidTransition {
        from: Option<VerificationState>,
        to: VerificationState,
    },
    /// The supplied code does not exist in the registry.
    ReasonCodeUnknown { code: String },
    /// The code exists but does not list the requested state.
    ReasonCodeNotApplicable {
        code: String,
        state: VerificationState,
    },
    /// The target state requires a reason code, or the code requires
    /// free-text justification, and none was supplied.
    JustificationRequired { state: VerificationState },
    /// The actor's privilege is below the code's floor.
    InsufficientPrivilege { code: String },
    /// The record's state changed between read and attempted write.
    /// Retry with a fresh read.
    StaleState,
    /// The dedup key was already processed; the original record stands.
    DuplicateRequest { existing: RecordId },
    /// Client clock drift exceeded the block threshold.
    ClockDriftBlocked { drift_secs: i64 },
}

impl RejectionReason {
    /// Stable detail code, used as the ledger column and log field.
    pub fn detail(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::ReasonCodeUnknown { .. } | Self::ReasonCodeNotApplicable { .. } => {
                "REASON_CODE_NOT_APPLICABLE"
            }
            Self::JustificationRequired { .. } => "JUSTIFICATION_REQUIRED",
            Self::InsufficientPrivilege { .. } => "INSUFFICIENT_PRIVILEGE",
            Self::StaleState => "STALE_STATE",
            Self::DuplicateRequest { .. } => "DUPLICATE_REQUEST",
            Self::ClockDriftBlocked { .. } => "CLOCK_DRIFT_BLOCKED",
        }
    }

    /// Whether the caller may resolve this by retrying with a fresh read.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StaleState)
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTransition { from, to } => {
                let from = from.map(|s| s.name()).unwrap_or("<none>");
                write!(f, "{}: {from} -> {to} is not allowed", self.detail())
            }
            Self::ReasonCodeUnknown { code } => {
                write!(f, "{}: unknown code '{code}'", self.detail())
            }
            Self::ReasonCodeNotApplicable { code, state } => {
                write!(f, "{}: '{code}' does not apply to {state}", self.detail())
            }
            Self::JustificationRequired { state } => {
                write!(f, "{}: {state} requires a justified reason", self.detail())
            }
            Self::InsufficientPrivilege { code } => {
                write!(f, "{}: actor below floor for '{code}'", self.detail())
            }
            Self::StaleState => {
                write!(f, "{}: state changed since read, retry", self.detail())
            }
            Self::DuplicateRequest { existing } => {
                write!(f, "{}: already processed as {existing}", self.detail())
            }
            Self::ClockDriftBlocked { drift_secs } => {
                write!(f, "{}: drift of {drift_secs}s exceeds limit", self.detail())
            }
        }
    }
}

/// One row per requested transition, accepted or rejected.
///
/// Written on every call path — no transition request is ever silently
/// dropped. Never mutated or deleted after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionAttempt {
    pub id: AttemptId,
    pub record_id: RecordId,
    /// State at request time; `None` for a record with no history yet.
    pub current_state: Option<VerificationState>,
    pub requested_state: VerificationState,
    pub reason_code: Option<String>,
    pub justification: Option<String>,
    pub actor_id: String,
    pub actor_origin: Option<String>,
    pub outcome: AttemptOutcome,
    /// Present iff `outcome == Rejected`.
    pub rejection: Option<RejectionReason>,
    /// Server time at which the request was evaluated.
    pub requested_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn detail_strings_are_stable() {
        let cases: Vec<(RejectionReason, &str)> = vec![
            (
                RejectionReason::InvalidTransition {
                    from: Some(VerificationState::Revoked),
                    to: VerificationState::Verified,
                },
                "INVALID_TRANSITION",
            ),
            (
                RejectionReason::ReasonCodeUnknown { code: "X".into() },
                "REASON_CODE_NOT_APPLICABLE",
            ),
            (
                RejectionReason::ReasonCodeNotApplicable {
                    code: "FACE_MISMATCH".into(),
                    state: VerificationState::Revoked,
                },
                "REASON_CODE_NOT_APPLICABLE",
            ),
            (
                RejectionReason::JustificationRequired {
                    state: VerificationState::Revoked,
                },
                "JUSTIFICATION_REQUIRED",
            ),
            (
                RejectionReason::InsufficientPrivilege {
                    code: "POLICY_EXCEPTION".into(),
                },
                "INSUFFICIENT_PRIVILEGE",
            ),
            (RejectionReason::StaleState, "STALE_STATE"),
            (
                RejectionReason::DuplicateRequest {
                    existing: RecordId::new(),
                },
                "DUPLICATE_REQUEST",
            ),
            (
                RejectionReason::ClockDriftBlocked { drift_secs: 700 },
                "CLOCK_DRIFT_BLOCKED",
            ),
        ];
        for (reason, expected) in cases {
            assert_eq!(reason.detail(), expected);
            assert!(reason.to_string().starts_with(expected));
        }
    }

    #[test]
    fn only_stale_state_is_retryable() {
        assert!(RejectionReason::StaleState.is_retryable());
        assert!(!RejectionReason::ClockDriftBlocked { drift_secs: 700 }.is_retryable());
        assert!(
            !RejectionReason::DuplicateRequest {
                existing: RecordId::new()
            }
            .is_retryable()
        );
    }

    #[test]
    fn invalid_transition_renders_missing_from_state() {
        let r = RejectionReason::InvalidTransition {
            from: None,
            to: VerificationState::Revoked,
        };
        assert_eq!(
            r.to_string(),
            "INVALID_TRANSITION: <none> -> REVOKED is not allowed"
        );
    }
}
