use crate::actor::PrivilegeLevel;
use crate::state::VerificationState;
use serde::{Deserialize, Serialize};

/// Category of a transition justification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReasonCategory {
    /// Raised by the fraud/biometric pipeline (mismatches, duplicates).
    SecurityReview,
    /// Closes out a review one way or the other.
    Resolution,
    /// First marking of a fresh record.
    InitialMarking,
}

/// Immutable catalog entry in the reason code registry.
///
/// Seeded once at configuration load; never mutated at runtime. A code lists
/// the target states it may justify, whether free-text justification must
/// accompany it, and the privilege floor for applying it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonCode {
    /// Unique key, SCREAMING_SNAKE by convention (`FACE_MISMATCH`).
    pub code: String,
    pub category: ReasonCategory,
    /// Target states this code may transition a record *into*.
    pub valid_for_states: Vec<VerificationState>,
    pub requires_justification: bool,
    /// System-issued codes may be applied by automated callers; the rest
    /// need a human at or above `min_privilege`.
    pub is_system_generated: bool,
    pub min_privilege: PrivilegeLevel,
}

impl ReasonCode {
    /// Whether this code may justify a transition into `state`.
    pub fn is_valid_for(&self, state: VerificationState) -> bool {
        self.valid_for_states.contains(&state)
    }

    /// Whether `privilege` clears the floor for applying this code.
    pub fn permits(&self, privilege: PrivilegeLevel) -> bool {
        privilege >= self.min_privilege
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code() -> ReasonCode {
        ReasonCode {
            code: "CONFIRMED_FRAUD".into(),
            category: ReasonCategory::SecurityReview,
            valid_for_states: vec![VerificationState::Revoked],
            requires_justification: true,
            is_system_generated: false,
            min_privilege: PrivilegeLevel::Operator,
        }
    }

    #[test]
    fn validity_is_per_target_state() {
        let c = code();
        assert!(c.is_valid_for(VerificationState::Revoked));
        assert!(!c.is_valid_for(VerificationState::Flagged));
    }

    #[test]
    fn privilege_floor_is_inclusive() {
        let c = code();
        assert!(!c.permits(PrivilegeLevel::Automated));
        assert!(c.permits(PrivilegeLevel::Operator));
        assert!(c.permits(PrivilegeLevel::Supervisor));
    }
}
