use serde::{Deserialize, Serialize};

/// Privilege carried by a caller identity.
///
/// Ordered: an actor at a given level may do everything the levels below it
/// may. The engine treats the value as already verified by the caller's
/// authorization layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PrivilegeLevel {
    /// Automated pipeline (duplicate detection, biometric matcher).
    Automated,
    /// Human reviewer with resolution authority.
    Operator,
    /// Elevated operator able to issue policy overrides.
    Supervisor,
}

/// Caller identity attached to every transition request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub privilege: PrivilegeLevel,
    /// Requester network origin, when the transport knows it.
    pub origin: Option<String>,
}

impl Actor {
    pub fn new(id: impl Into<String>, privilege: PrivilegeLevel) -> Self {
        Self {
            id: id.into(),
            privilege,
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}
