use attest_types::{AttemptId, ClockDriftObservation, DriftThresholds, RecordId, SubjectScope};
use chrono::{DateTime, Utc};

/// Compares a caller-supplied timestamp against authoritative server time.
///
/// Client clocks are untrusted input: the analyzer never promotes a client
/// value to record time. It measures the disagreement, classifies it, and
/// decides whether the magnitude is large enough to reject the attempt —
/// drift past the block threshold reads as deliberate manipulation, not
/// ordinary skew.
#[derive(Debug)]
pub struct DriftAnalyzer {
    thresholds: DriftThresholds,
}

impl DriftAnalyzer {
    pub fn new(thresholds: DriftThresholds) -> Self {
        Self { thresholds }
    }

    /// Measure and classify one client/server timestamp pair.
    pub fn evaluate(
        &self,
        attempt_id: AttemptId,
        record_id: RecordId,
        subject: SubjectScope,
        client_at: DateTime<Utc>,
        server_at: DateTime<Utc>,
    ) -> ClockDriftObservation {
        ClockDriftObservation::measure(
            attempt_id,
            record_id,
            subject,
            client_at,
            server_at,
            &self.thresholds,
        )
    }

    /// Whether an observation is past the block threshold.
    pub fn blocks(&self, observation: &ClockDriftObservation) -> bool {
        self.thresholds.blocks(observation.drift_secs)
    }

    pub fn thresholds(&self) -> &DriftThresholds {
        &self.thresholds
    }
}

impl Default for DriftAnalyzer {
    fn default() -> Self {
        Self::new(DriftThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_types::DriftSeverity;
    use chrono::Duration;

    fn observe(analyzer: &DriftAnalyzer, drift: Duration) -> ClockDriftObservation {
        let server = Utc::now();
        analyzer.evaluate(
            AttemptId::new(),
            RecordId::new(),
            SubjectScope::new("p-1", "s-1"),
            server + drift,
            server,
        )
    }

    #[test]
    fn small_skew_passes_as_low() {
        let analyzer = DriftAnalyzer::default();
        let obs = observe(&analyzer, Duration::seconds(5));
        assert_eq!(obs.severity, DriftSeverity::Low);
        assert!(!analyzer.blocks(&obs));
    }

    #[test]
    fn drift_at_the_block_threshold_is_high_but_allowed() {
        let analyzer = DriftAnalyzer::default();
        let obs = observe(&analyzer, Duration::seconds(600));
        assert_eq!(obs.severity, DriftSeverity::High);
        assert!(!analyzer.blocks(&obs));
    }

    #[test]
    fn one_second_past_the_threshold_always_blocks() {
        let analyzer = DriftAnalyzer::default();
        assert!(analyzer.blocks(&observe(&analyzer, Duration::seconds(601))));
        assert!(analyzer.blocks(&observe(&analyzer, Duration::seconds(-601))));
    }

    #[test]
    fn custom_thresholds_are_honored() {
        let analyzer = DriftAnalyzer::new(DriftThresholds {
            medium_secs: 10,
            high_secs: 20,
            block_secs: 30,
        });
        assert_eq!(
            observe(&analyzer, Duration::seconds(15)).severity,
            DriftSeverity::Medium
        );
        assert!(analyzer.blocks(&observe(&analyzer, Duration::seconds(31))));
    }
}
