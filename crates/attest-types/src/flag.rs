use crate::ids::{EntryId, FlagId, SubjectScope};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Detective finding from the timeline consistency checker.
///
/// Points at two committed history entries for the same subject whose
/// declared business timestamps invert their real commit order — a
/// physically impossible ordering when both claim independent observation.
/// The flag never mutates either entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityFlag {
    pub id: FlagId,
    pub subject: SubjectScope,
    /// Entry that was durably committed first in real time.
    pub earlier_entry: EntryId,
    /// Entry committed later but claiming an earlier business time.
    pub later_entry: EntryId,
    pub earlier_business_at: DateTime<Utc>,
    pub later_business_at: DateTime<Utc>,
    pub detected_at: DateTime<Utc>,
}
