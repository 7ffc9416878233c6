pub mod actor;
pub mod attempt;
pub mod drift;
pub mod flag;
pub mod history;
pub mod ids;
pub mod reason;
pub mod state;

pub use actor::{Actor, PrivilegeLevel};
pub use attempt::{AttemptOutcome, RejectionReason, TransitionAttempt};
pub use drift::{ClockDriftObservation, DriftSeverity, DriftThresholds};
pub use flag::IntegrityFlag;
pub use history::HistoryEntry;
pub use ids::{AttemptId, DedupKey, EntryId, FlagId, RecordId, SubjectScope};
pub use reason::{ReasonCategory, ReasonCode};
pub use state::VerificationState;
