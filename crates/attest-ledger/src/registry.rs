use attest_types::{PrivilegeLevel, ReasonCategory, ReasonCode, VerificationState};
use std::collections::HashMap;

/// Closed vocabulary of transition justifications.
///
/// Seeded once from configuration; no runtime mutation path exists. Changing
/// the catalog means loading a new one at deployment time.
#[derive(Debug)]
pub struct ReasonCodeRegistry {
    codes: HashMap<String, ReasonCode>,
}

impl ReasonCodeRegistry {
    /// Build a registry from a fixed catalog. Later duplicates of a code
    /// are ignored; the first definition stands.
    pub fn from_catalog(catalog: impl IntoIterator<Item = ReasonCode>) -> Self {
        let mut codes = HashMap::new();
        for code in catalog {
            codes.entry(code.code.clone()).or_insert(code);
        }
        Self { codes }
    }

    /// The catalog a deployment ships by default.
    pub fn with_default_catalog() -> Self {
        Self::from_catalog(default_catalog())
    }

    pub fn get(&self, code: &str) -> Option<&ReasonCode> {
        self.codes.get(code)
    }

    /// Whether `code` exists and lists `state` as a valid target.
    pub fn is_valid_for_state(&self, code: &str, state: VerificationState) -> bool {
        self.get(code).is_some_and(|c| c.is_valid_for(state))
    }

    /// Whether `code` exists and demands free-text justification.
    pub fn requires_justification(&self, code: &str) -> bool {
        self.get(code).is_some_and(|c| c.requires_justification)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

fn code(
    name: &str,
    category: ReasonCategory,
    valid_for_states: Vec<VerificationState>,
    requires_justification: bool,
    is_system_generated: bool,
    min_privilege: PrivilegeLevel,
) -> ReasonCode {
    ReasonCode {
        code: name.to_string(),
        category,
        valid_for_states,
        requires_justification,
        is_system_generated,
        min_privilege,
    }
}

/// Default reason code catalog.
pub fn default_catalog() -> Vec<ReasonCode> {
    use ReasonCategory::{InitialMarking, Resolution, SecurityReview};
    use VerificationState::{Flagged, ManualOverride, Revoked, Verified};

    vec![
        code(
            "MANUAL_VERIFIED",
            InitialMarking,
            vec![Verified],
            false,
            false,
            PrivilegeLevel::Operator,
        ),
        code(
            "AUTO_VERIFIED",
            InitialMarking,
            vec![Verified],
            false,
            true,
            PrivilegeLevel::Automated,
        ),
        code(
            "FACE_MISMATCH",
            SecurityReview,
            vec![Flagged],
            false,
            true,
            PrivilegeLevel::Automated,
        ),
        code(
            "DUPLICATE_DETECTED",
            SecurityReview,
            vec![Flagged],
            false,
            true,
            PrivilegeLevel::Automated,
        ),
        code(
            "CONFIRMED_FRAUD",
            SecurityReview,
            vec![Revoked],
            true,
            false,
            PrivilegeLevel::Operator,
        ),
        code(
            "REVIEW_CLEARED",
            Resolution,
            vec![Verified],
            false,
            false,
            PrivilegeLevel::Operator,
        ),
        code(
            "POLICY_EXCEPTION",
            Resolution,
            vec![ManualOverride],
            true,
            false,
            PrivilegeLevel::Supervisor,
        ),
    ]
}
