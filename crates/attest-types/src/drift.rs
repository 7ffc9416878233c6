use crate::ids::{AttemptId, RecordId, SubjectScope};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity classification for a client/server clock disagreement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DriftSeverity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for DriftSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => f.write_str("LOW"),
            Self::Medium => f.write_str("MEDIUM"),
            Self::High => f.write_str("HIGH"),
        }
    }
}

/// Tunable drift boundaries, in seconds of absolute drift.
///
/// Severity: `Low` below `medium_secs`, `Medium` from `medium_secs` through
/// `high_secs` inclusive, `High` above. Blocking is exclusive at the
/// boundary: an attempt is rejected only when drift is strictly greater
/// than `block_secs`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftThresholds {
    pub medium_secs: i64,
    pub high_secs: i64,
    pub block_secs: i64,
}

impl Default for DriftThresholds {
    fn default() -> Self {
        Self {
            medium_secs: 60,
            high_secs: 300,
            block_secs: 600,
        }
    }
}

impl DriftThresholds {
    /// Classify an absolute drift magnitude.
    pub fn classify(&self, drift_secs: i64) -> DriftSeverity {
        let magnitude = drift_secs.abs();
        if magnitude < self.medium_secs {
            DriftSeverity::Low
        } else if magnitude <= self.high_secs {
            DriftSeverity::Medium
        } else {
            DriftSeverity::High
        }
    }

    /// Whether the drift is large enough to reject the attempt outright.
    pub fn blocks(&self, drift_secs: i64) -> bool {
        drift_secs.abs() > self.block_secs
    }
}

/// Per-attempt record of a client-reported timestamp against server time.
///
/// The server timestamp is always ground truth; the client value is stored
/// for fraud and forensic analysis only. Immutable once written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockDriftObservation {
    pub attempt_id: AttemptId,
    pub record_id: RecordId,
    pub subject: SubjectScope,
    pub client_at: DateTime<Utc>,
    pub server_at: DateTime<Utc>,
    /// Signed: negative means the client clock runs behind the server.
    pub drift_secs: i64,
    pub severity: DriftSeverity,
}

impl ClockDriftObservation {
    /// Measure drift between a client-supplied timestamp and server time.
    pub fn measure(
        attempt_id: AttemptId,
        record_id: RecordId,
        subject: SubjectScope,
        client_at: DateTime<Utc>,
        server_at: DateTime<Utc>,
        thresholds: &DriftThresholds,
    ) -> Self {
        let drift_secs = (client_at - server_at).num_seconds();
        Self {
            attempt_id,
            record_id,
            subject,
            client_at,
            server_at,
            drift_secs,
            severity: thresholds.classify(drift_secs),
        }
    }
}
