use attest_types::{ClockDriftObservation, DriftSeverity, EntryId, HistoryEntry, SubjectScope};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Narrows forensic queries to a person and/or session.
///
/// Tenant/organization isolation is the caller's responsibility; this
/// filter only scopes within whatever the caller may already see.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScopeFilter {
    pub person_id: Option<String>,
    pub session_id: Option<String>,
}

impl ScopeFilter {
    /// Matches everything.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn for_person(person_id: impl Into<String>) -> Self {
        Self {
            person_id: Some(person_id.into()),
            session_id: None,
        }
    }

    pub fn for_session(session_id: impl Into<String>) -> Self {
        Self {
            person_id: None,
            session_id: Some(session_id.into()),
        }
    }

    pub fn matches(&self, subject: &SubjectScope) -> bool {
        self.person_id
            .as_deref()
            .is_none_or(|p| p == subject.person_id)
            && self
                .session_id
                .as_deref()
                .is_none_or(|s| s == subject.session_id)
    }
}

/// A subject with more than one accepted history entry inside the window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicatePattern {
    pub subject: SubjectScope,
    pub entry_ids: Vec<EntryId>,
}

/// Subjects with more than one accepted entry within `window` of each
/// other, by server timestamp. `entries` must be in commit order.
pub fn find_duplicate_patterns<'a>(
    entries: impl Iterator<Item = &'a HistoryEntry>,
    filter: &ScopeFilter,
    window: Duration,
) -> Vec<DuplicatePattern> {
    let mut by_subject: Vec<(SubjectScope, Vec<&HistoryEntry>)> = Vec::new();
    for entry in entries.filter(|e| filter.matches(&e.subject)) {
        match by_subject.iter_mut().find(|(s, _)| *s == entry.subject) {
            Some((_, group)) => group.push(entry),
            None => by_subject.push((entry.subject.clone(), vec![entry])),
        }
    }

    by_subject
        .into_iter()
        .filter_map(|(subject, group)| {
            let clustered: Vec<EntryId> = group
                .iter()
                .enumerate()
                .filter(|(i, entry)| {
                    group.iter().enumerate().any(|(j, other)| {
                        *i != j && (entry.recorded_at - other.recorded_at).abs() <= window
                    })
                })
                .map(|(_, entry)| entry.id)
                .collect();
            (clustered.len() > 1).then_some(DuplicatePattern {
                subject,
                entry_ids: clustered,
            })
        })
        .collect()
}

/// Observations at or above `min_severity` for subjects the filter matches.
///
/// Severity already encodes the thresholds the observation was measured
/// under; the query never reclassifies.
pub fn find_drift_anomalies<'a>(
    observations: impl Iterator<Item = &'a ClockDriftObservation>,
    filter: &ScopeFilter,
    min_severity: DriftSeverity,
) -> Vec<&'a ClockDriftObservation> {
    observations
        .filter(|obs| filter.matches(&obs.subject) && obs.severity >= min_severity)
        .collect()
}
