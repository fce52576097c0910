//! Per-row validation and in-batch deduplication.
//!
//! Classification is total: every candidate row is either accepted or counted
//! under exactly one rejection reason, in original row order. Deduplication
//! is scoped to the batch; collisions with already-stored contacts are the
//! store's concern (unique constraint on owner + email).

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use super::mapping::CandidateRecord;
use crate::models::{ContactStatus, NewContact};

/// Shape check for `local@domain.tld`. Deliberately loose; the goal is to
/// catch obviously broken values before the bulk write, not to police RFC
/// 5321.
fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

/// Shape check shared with the single-contact create and edit paths.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Rejection tallies, one counter per reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReasonCounts {
    pub missing_email: usize,
    pub invalid_email: usize,
    pub duplicate_email: usize,
}

impl ReasonCounts {
    pub fn total(&self) -> usize {
        self.missing_email + self.invalid_email + self.duplicate_email
    }
}

/// The classified partition of one import batch.
///
/// Invariant: `accepted.len() + rejected.total()` equals the number of
/// candidate rows fed in.
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub accepted: Vec<NewContact>,
    pub rejected: ReasonCounts,
}

/// Classify a batch of candidate records in one ordered pass.
///
/// Checks run in a fixed order per row: email presence, email shape, then
/// in-batch uniqueness on the lower-cased email. The first row carrying a
/// given email wins; later rows with the same email (in any case) are
/// rejected as duplicates. Accepted rows get their email lower-cased, the
/// name defaulted to the email when blank, and the status normalized.
pub fn classify(candidates: Vec<CandidateRecord>) -> ImportOutcome {
    let mut accepted = Vec::new();
    let mut rejected = ReasonCounts::default();
    let mut seen = HashSet::new();

    for candidate in candidates {
        let Some(raw_email) = candidate.email else {
            rejected.missing_email += 1;
            continue;
        };

        let email = raw_email.trim().to_lowercase();
        if !is_valid_email(&email) {
            rejected.invalid_email += 1;
            continue;
        }

        if !seen.insert(email.clone()) {
            rejected.duplicate_email += 1;
            continue;
        }

        let name = candidate
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| email.clone());

        accepted.push(NewContact {
            name,
            email,
            phone: candidate.phone,
            company: candidate.company,
            status: ContactStatus::normalize(candidate.status.as_deref()),
            notes: candidate.notes,
        });
    }

    ImportOutcome { accepted, rejected }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: Option<&str>, email: Option<&str>, status: Option<&str>) -> CandidateRecord {
        CandidateRecord {
            name: name.map(str::to_string),
            email: email.map(str::to_string),
            status: status.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_email_is_rejected() {
        let outcome = classify(vec![candidate(Some("Alice"), None, None)]);
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.rejected.missing_email, 1);
    }

    #[test]
    fn test_invalid_email_shapes_are_rejected() {
        for bad in ["no-at-sign", "missing@tld", "two words@example.com", "@example.com"] {
            let outcome = classify(vec![candidate(None, Some(bad), None)]);
            assert!(outcome.accepted.is_empty(), "{bad} should be rejected");
            assert_eq!(outcome.rejected.invalid_email, 1, "{bad}");
        }
    }

    #[test]
    fn test_duplicate_differs_only_in_case() {
        let outcome = classify(vec![
            candidate(Some("First"), Some("ALICE@example.com"), None),
            candidate(Some("Second"), Some("alice@EXAMPLE.com"), None),
        ]);
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.accepted[0].name, "First");
        assert_eq!(outcome.accepted[0].email, "alice@example.com");
        assert_eq!(outcome.rejected.duplicate_email, 1);
    }

    #[test]
    fn test_blank_name_defaults_to_email() {
        let outcome = classify(vec![candidate(Some("   "), Some("Carol@Example.com"), None)]);
        assert_eq!(outcome.accepted[0].name, "carol@example.com");
    }

    #[test]
    fn test_status_normalization() {
        let outcome = classify(vec![
            candidate(Some("A"), Some("a@example.com"), Some("Unsubscribed")),
            candidate(Some("B"), Some("b@example.com"), Some("bounced")),
            candidate(Some("C"), Some("c@example.com"), None),
        ]);
        assert_eq!(outcome.accepted[0].status, ContactStatus::Unsubscribed);
        // Unrecognized and absent status values both become active.
        assert_eq!(outcome.accepted[1].status, ContactStatus::Active);
        assert_eq!(outcome.accepted[2].status, ContactStatus::Active);
    }

    #[test]
    fn test_partition_totality() {
        let batch = vec![
            candidate(None, Some("a@example.com"), None),
            candidate(None, None, None),
            candidate(None, Some("bogus"), None),
            candidate(None, Some("a@example.com"), None),
            candidate(None, Some("b@example.com"), None),
        ];
        let total = batch.len();
        let outcome = classify(batch);
        assert_eq!(outcome.accepted.len() + outcome.rejected.total(), total);
    }
}
