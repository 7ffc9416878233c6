use serde::{Deserialize, Serialize};

/// Verification state attached to an attendance record.
///
/// Exactly one current state exists per record at any time, and it is always
/// derived from the most recent accepted history entry — never stored as a
/// separately mutable field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerificationState {
    /// Attendance accepted as genuine.
    Verified,
    /// Under security review; resolution pending.
    Flagged,
    /// Attendance struck as fraudulent or invalid. Absorbing — no exit.
    Revoked,
    /// Operator decision supersedes the automated pipeline.
    ManualOverride,
}

impl VerificationState {
    /// Stable wire name, used in ledger rows and log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Verified => "VERIFIED",
            Self::Flagged => "FLAGGED",
            Self::Revoked => "REVOKED",
            Self::ManualOverride => "MANUAL_OVERRIDE",
        }
    }

    /// Whether entering this state requires a reason code from the registry.
    ///
    /// Verified is the ordinary marking path and accepts a code optionally;
    /// the three exceptional states always carry one.
    pub fn requires_reason_code(&self) -> bool {
        matches!(self, Self::Flagged | Self::Revoked | Self::ManualOverride)
    }

    /// Whether any transition out of this state exists.
    pub fn is_absorbing(&self) -> bool {
        matches!(self, Self::Revoked)
    }
}

impl std::fmt::Display for VerificationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_stable() {
        assert_eq!(VerificationState::Verified.name(), "VERIFIED");
        assert_eq!(VerificationState::Flagged.name(), "FLAGGED");
        assert_eq!(VerificationState::Revoked.name(), "REVOKED");
        assert_eq!(VerificationState::ManualOverride.name(), "MANUAL_OVERRIDE");
    }

    #[test]
    fn only_verified_is_exempt_from_reason_codes() {
        assert!(!VerificationState::Verified.requires_reason_code());
        assert!(VerificationState::Flagged.requires_reason_code());
        assert!(VerificationState::Revoked.requires_reason_code());
        assert!(VerificationState::ManualOverride.requires_reason_code());
    }

    #[test]
    fn revoked_is_the_only_absorbing_state() {
        assert!(VerificationState::Revoked.is_absorbing());
        assert!(!VerificationState::Verified.is_absorbing());
        assert!(!VerificationState::Flagged.is_absorbing());
        assert!(!VerificationState::ManualOverride.is_absorbing());
    }
}
