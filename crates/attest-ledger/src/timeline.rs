use attest_types::{FlagId, HistoryEntry, IntegrityFlag};
use chrono::{DateTime, Utc};

/// Post-commit detector for causally impossible orderings.
///
/// A newly committed entry whose declared business timestamp is *earlier*
/// than that of a same-subject entry committed *earlier in real time*
/// signals clock manipulation or backdating. The checker only observes:
/// it emits flags pointing at both entries and never blocks or mutates the
/// triggering write. Skipping a run delays detection, nothing else.
#[derive(Debug, Default)]
pub struct TimelineChecker;

impl TimelineChecker {
    pub fn new() -> Self {
        Self
    }

    /// Check one freshly committed entry against everything committed
    /// before it. `prior_commits` must be in real commit order and must not
    /// include the new entry itself.
    pub fn check_commit<'a>(
        &self,
        prior_commits: impl Iterator<Item = &'a HistoryEntry>,
        committed: &HistoryEntry,
        detected_at: DateTime<Utc>,
    ) -> Vec<IntegrityFlag> {
        let Some(committed_business_at) = committed.business_at else {
            // No declared business time, nothing to order against.
            return Vec::new();
        };

        prior_commits
            .filter(|prior| prior.subject == committed.subject && prior.id != committed.id)
            .filter_map(|prior| {
                let prior_business_at = prior.business_at?;
                (prior_business_at > committed_business_at).then(|| IntegrityFlag {
                    id: FlagId::new(),
                    subject: committed.subject.clone(),
                    earlier_entry: prior.id,
                    later_entry: committed.id,
                    earlier_business_at: prior_business_at,
                    later_business_at: committed_business_at,
                    detected_at,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_types::{RecordId, SubjectScope, VerificationState};
    use chrono::Duration;

    fn entry(subject: &SubjectScope, business_at: Option<DateTime<Utc>>) -> HistoryEntry {
        HistoryEntry::sealed(
            RecordId::new(),
            subject.clone(),
            0,
            None,
            VerificationState::Verified,
            None,
            None,
            "op".into(),
            Utc::now(),
            business_at,
        )
    }

    #[test]
    fn backdated_commit_against_same_subject_is_flagged() {
        let subject = SubjectScope::new("p-1", "s-1");
        let now = Utc::now();
        let prior = entry(&subject, Some(now));
        let backdated = entry(&subject, Some(now - Duration::minutes(30)));

        let flags = TimelineChecker::new().check_commit([&prior].into_iter(), &backdated, now);
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].earlier_entry, prior.id);
        assert_eq!(flags[0].later_entry, backdated.id);
        assert_eq!(flags[0].subject, subject);
    }

    #[test]
    fn forward_ordering_raises_nothing() {
        let subject = SubjectScope::new("p-1", "s-1");
        let now = Utc::now();
        let prior = entry(&subject, Some(now - Duration::minutes(30)));
        let later = entry(&subject, Some(now));

        let flags = TimelineChecker::new().check_commit([&prior].into_iter(), &later, now);
        assert!(flags.is_empty());
    }

    #[test]
    fn other_subjects_do_not_conflict() {
        let now = Utc::now();
        let prior = entry(&SubjectScope::new("p-1", "s-1"), Some(now));
        let backdated = entry(
            &SubjectScope::new("p-2", "s-1"),
            Some(now - Duration::minutes(30)),
        );

        let flags = TimelineChecker::new().check_commit([&prior].into_iter(), &backdated, now);
        assert!(flags.is_empty());
    }

    #[test]
    fn entries_without_business_time_never_flag() {
        let subject = SubjectScope::new("p-1", "s-1");
        let now = Utc::now();
        let prior = entry(&subject, None);
        let committed = entry(&subject, Some(now - Duration::hours(1)));

        let checker = TimelineChecker::new();
        assert!(
            checker
                .check_commit([&prior].into_iter(), &committed, now)
                .is_empty()
        );
        // And a committed entry without business time is unordered.
        let undeclared = entry(&subject, None);
        assert!(
            checker
                .check_commit([&committed].into_iter(), &undeclared, now)
                .is_empty()
        );
    }

    #[test]
    fn every_conflicting_prior_yields_its_own_flag() {
        let subject = SubjectScope::new("p-1", "s-1");
        let now = Utc::now();
        let prior_a = entry(&subject, Some(now - Duration::minutes(10)));
        let prior_b = entry(&subject, Some(now));
        let backdated = entry(&subject, Some(now - Duration::hours(2)));

        let flags = TimelineChecker::new().check_commit(
            [&prior_a, &prior_b].into_iter(),
            &backdated,
            now,
        );
        assert_eq!(flags.len(), 2);
    }
}
