//! Append-only ledgers and validation components for the attendance
//! integrity engine.
//!
//! The storage model is an arena-with-index: every persisted collection is
//! an [`AppendOnlyLog`] that permits insertion and positional reads only.
//! Update and delete operations do not exist in the API, so immutability is
//! enforced below application code rather than by convention.

pub mod analytics;
pub mod attempts;
pub mod drift;
pub mod error;
pub mod history;
pub mod idempotency;
pub mod log;
pub mod registry;
pub mod timeline;
pub mod transition;

pub use analytics::{DuplicatePattern, ScopeFilter, find_drift_anomalies, find_duplicate_patterns};
pub use attempts::AttemptLedger;
pub use drift::DriftAnalyzer;
pub use error::LedgerError;
pub use history::HistoryStore;
pub use idempotency::IdempotencyLedger;
pub use log::AppendOnlyLog;
pub use registry::ReasonCodeRegistry;
pub use timeline::TimelineChecker;
pub use transition::{TransitionRules, TransitionSpec};
