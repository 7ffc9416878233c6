use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// The wrapped uuid, for storage adapters.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

uuid_id! {
    /// Identifies a single attendance record. Minted by the domain layer;
    /// opaque to this engine.
    RecordId
}

uuid_id! {
    /// Identifies one row in the transition attempt ledger.
    AttemptId
}

uuid_id! {
    /// Identifies one accepted entry in the immutable history store.
    EntryId
}

uuid_id! {
    /// Identifies one integrity flag written by the timeline checker.
    FlagId
}

/// Caller-supplied deduplication token, scoped to the source system that
/// minted it. Two systems may reuse the same key string without colliding.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DedupKey {
    pub key: String,
    pub source_system: String,
}

impl DedupKey {
    pub fn new(key: impl Into<String>, source_system: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            source_system: source_system.into(),
        }
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.source_system, self.key)
    }
}

/// The underlying person/session subject of an attendance record.
///
/// Timeline consistency and duplicate-pattern analytics group by this scope;
/// tenant isolation stays with the caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectScope {
    pub person_id: String,
    pub session_id: String,
}

impl SubjectScope {
    pub fn new(person_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            person_id: person_id.into(),
            session_id: session_id.into(),
        }
    }
}

impl fmt::Display for SubjectScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.person_id, self.session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_distinct() {
        assert_ne!(RecordId::new(), RecordId::new());
        assert_ne!(AttemptId::new(), AttemptId::new());
    }

    #[test]
    fn dedup_keys_are_scoped_by_source_system() {
        let a = DedupKey::new("K1", "kiosk");
        let b = DedupKey::new("K1", "mobile");
        assert_ne!(a, b);
        assert_eq!(a, DedupKey::new("K1", "kiosk"));
    }

    #[test]
    fn record_id_round_trips_through_serde() {
        let id = RecordId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
