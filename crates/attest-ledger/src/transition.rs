use crate::registry::ReasonCodeRegistry;
use attest_types::{Actor, PrivilegeLevel, RejectionReason, VerificationState};

/// Explicit allow-list of legal `(from, to)` state pairs.
///
/// `from = None` is the initial marking of a record with no history.
/// `Revoked` is absorbing: nothing transitions out of it.
#[derive(Debug, Default)]
pub struct TransitionRules;

impl TransitionRules {
    pub fn new() -> Self {
        Self
    }

    pub fn is_allowed(&self, from: Option<VerificationState>, to: VerificationState) -> bool {
        use VerificationState::{Flagged, ManualOverride, Revoked, Verified};
        match (from, to) {
            // Initial marking: a fresh record is verified or flagged first.
            (None, Verified) | (None, Flagged) => true,
            (None, _) => false,
            (Some(Verified), Flagged | Revoked | ManualOverride) => true,
            (Some(Flagged), Verified | Revoked | ManualOverride) => true,
            // An override can be re-challenged.
            (Some(ManualOverride), Flagged) => true,
            (Some(Revoked), _) => false,
            _ => false,
        }
    }
}

/// The validated portion of a transition request.
///
/// Borrowed view over the caller's request; validation never takes
/// ownership of request data.
#[derive(Clone, Copy, Debug)]
pub struct TransitionSpec<'a> {
    pub current_state: Option<VerificationState>,
    pub requested_state: VerificationState,
    pub reason_code: Option<&'a str>,
    pub justification: Option<&'a str>,
    pub actor: &'a Actor,
}

impl TransitionSpec<'_> {
    /// Run the full validation order against the rules and registry.
    ///
    /// Order, first failure wins:
    /// 1. transition legality,
    /// 2. reason code presence for states that demand one,
    /// 3. code existence,
    /// 4. code applicability to the target state,
    /// 5. actor privilege against the code's floor,
    /// 6. justification text when the code requires it.
    pub fn validate(
        &self,
        rules: &TransitionRules,
        registry: &ReasonCodeRegistry,
    ) -> Result<(), RejectionReason> {
        if !rules.is_allowed(self.current_state, self.requested_state) {
            return Err(RejectionReason::InvalidTransition {
                from: self.current_state,
                to: self.requested_state,
            });
        }

        let code = match self.reason_code {
            Some(code) => code,
            None => {
                if self.requested_state.requires_reason_code() {
                    // A missing code is a missing justification for entering
                    // a justification-bearing state.
                    return Err(RejectionReason::JustificationRequired {
                        state: self.requested_state,
                    });
                }
                // Codeless transitions are the manual path: a human floor
                // applies since automated callers always carry a system code.
                if self.actor.privilege < PrivilegeLevel::Operator {
                    return Err(RejectionReason::InsufficientPrivilege {
                        code: "<none>".to_string(),
                    });
                }
                return Ok(());
            }
        };

        let Some(reason) = registry.get(code) else {
            return Err(RejectionReason::ReasonCodeUnknown {
                code: code.to_string(),
            });
        };
        if !reason.is_valid_for(self.requested_state) {
            return Err(RejectionReason::ReasonCodeNotApplicable {
                code: code.to_string(),
                state: self.requested_state,
            });
        }
        if !reason.permits(self.actor.privilege) {
            return Err(RejectionReason::InsufficientPrivilege {
                code: code.to_string(),
            });
        }
        if reason.requires_justification
            && self.justification.is_none_or(|text| text.trim().is_empty())
        {
            return Err(RejectionReason::JustificationRequired {
                state: self.requested_state,
            });
        }
        Ok(())
    }
}
