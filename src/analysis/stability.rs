//! Matching validation and stability checks.
//!
//! A pair `(a, b)` *blocks* a matching when `a` ranks `b` above `a`'s
//! partner and `b` ranks `a` above `b`'s partner. Holding nobody ranks below
//! every real counterpart on both sides. A matching is stable when no pair
//! blocks it.

use std::collections::{HashMap, HashSet};

use crate::analysis::RankIndex;
use crate::engine::validate::check_consistency;
use crate::error::{InvalidInput, Result};
use crate::types::{Matching, ParticipantId, PreferenceTable};

/// A pair that would both rather be with each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockingPair {
    /// Group-A participant.
    pub proposer: ParticipantId,
    /// Group-B participant.
    pub receiver: ParticipantId,
}

/// Check that `matching` fits the tables.
///
/// The tables must be mutually consistent, the matching must cover exactly
/// the group-B participants, and every partner must be a distinct group-A
/// participant.
pub fn validate_matching(
    group_a: &PreferenceTable,
    group_b: &PreferenceTable,
    matching: &Matching,
) -> Result<()> {
    check_consistency(group_a, group_b)?;

    if matching.len() != group_b.len() {
        return Err(mismatch(format!(
            "matching covers {} receivers, group B has {}",
            matching.len(),
            group_b.len()
        )));
    }

    let mut seen = HashSet::with_capacity(group_a.len());
    for (receiver, partner) in matching.iter() {
        if !group_b.contains(receiver.as_str()) {
            return Err(mismatch(format!("'{receiver}' is not in group B")));
        }
        if let Some(proposer) = partner.id() {
            if !group_a.contains(proposer.as_str()) {
                return Err(mismatch(format!("'{proposer}' is not in group A")));
            }
            if !seen.insert(proposer) {
                return Err(mismatch(format!("'{proposer}' is matched more than once")));
            }
        }
    }

    Ok(())
}

/// Every pair blocking `matching`, ordered by receiver then by the
/// receiver's preference.
///
/// # Errors
///
/// [`MatchError::InvalidInput`](crate::error::MatchError::InvalidInput) if
/// the matching does not fit the tables.
pub fn blocking_pairs(
    group_a: &PreferenceTable,
    group_b: &PreferenceTable,
    matching: &Matching,
) -> Result<Vec<BlockingPair>> {
    validate_matching(group_a, group_b, matching)?;

    let a_ranks = RankIndex::new(group_a);
    let partner_of_a: HashMap<&str, &str> = matching
        .matched_pairs()
        .map(|(b, a)| (a.as_str(), b.as_str()))
        .collect();

    let mut blocking = Vec::new();
    for (receiver, partner) in matching.iter() {
        let Some(list) = group_b.list(receiver.as_str()) else {
            continue;
        };

        // Suitors `receiver` ranks above their current partner.
        let cutoff = partner
            .id()
            .and_then(|a| list.rank_of(a.as_str()))
            .unwrap_or(list.len());

        for suitor in &list.ranking[..cutoff] {
            let wants = match partner_of_a.get(suitor.as_str()) {
                Some(current) => {
                    a_ranks.prefers(suitor.as_str(), receiver.as_str(), current)
                }
                None => true,
            };
            if wants {
                blocking.push(BlockingPair {
                    proposer: suitor.clone(),
                    receiver: receiver.clone(),
                });
            }
        }
    }

    Ok(blocking)
}

/// True if no pair blocks `matching`.
///
/// # Example
///
/// ```
/// use stable_marriage::analysis::is_stable;
/// use stable_marriage::types::{Matching, Partner, PreferenceTable};
///
/// let a = PreferenceTable::from_lists([("a1", ["b1", "b2"]), ("a2", ["b1", "b2"])]).unwrap();
/// let b = PreferenceTable::from_lists([("b1", ["a1", "a2"]), ("b2", ["a2", "a1"])]).unwrap();
///
/// let good = Matching::from_pairs([("b1", Partner::Matched("a1".into())), ("b2", Partner::Matched("a2".into()))]);
/// let bad = Matching::from_pairs([("b1", Partner::Matched("a2".into())), ("b2", Partner::Matched("a1".into()))]);
///
/// assert!(is_stable(&a, &b, &good).unwrap());
/// assert!(!is_stable(&a, &b, &bad).unwrap());
/// ```
pub fn is_stable(group_a: &PreferenceTable, group_b: &PreferenceTable, matching: &Matching) -> Result<bool> {
    blocking_pairs(group_a, group_b, matching).map(|pairs| pairs.is_empty())
}

fn mismatch(reason: String) -> crate::error::MatchError {
    InvalidInput::MatchingMismatch { reason }.into()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::find_stable_matching;
    use crate::error::MatchError;
    use crate::types::Partner;

    fn table(lists: &[(&str, &[&str])]) -> PreferenceTable {
        PreferenceTable::from_lists(lists.iter().map(|(owner, ranking)| (*owner, ranking.iter().copied())))
            .unwrap()
    }

    fn matching(pairs: &[(&str, Option<&str>)]) -> Matching {
        Matching::from_pairs(
            pairs
                .iter()
                .map(|(b, a)| (*b, Partner::from(a.map(ParticipantId::from)))),
        )
    }

    fn square() -> (PreferenceTable, PreferenceTable) {
        (
            table(&[("a1", &["b1", "b2"]), ("a2", &["b1", "b2"])]),
            table(&[("b1", &["a1", "a2"]), ("b2", &["a2", "a1"])]),
        )
    }

    #[test]
    fn test_engine_output_is_stable() {
        let (a, b) = square();
        let result = find_stable_matching(&a, &b).unwrap();
        assert!(is_stable(&a, &b, &result).unwrap());
    }

    #[test]
    fn test_blocking_pair_found() {
        let (a, b) = square();
        let crossed = matching(&[("b1", Some("a2")), ("b2", Some("a1"))]);
        let pairs = blocking_pairs(&a, &b, &crossed).unwrap();
        assert_eq!(
            pairs,
            [BlockingPair {
                proposer: "a1".into(),
                receiver: "b1".into()
            }]
        );
    }

    #[test]
    fn test_unmatched_on_both_sides_blocks() {
        let a = table(&[("a1", &["b1", "b2"])]);
        let b = table(&[("b1", &["a1"]), ("b2", &["a1"])]);
        let empty = matching(&[("b1", None), ("b2", None)]);
        let pairs = blocking_pairs(&a, &b, &empty).unwrap();
        assert_eq!(pairs.len(), 2);

        let settled = matching(&[("b1", Some("a1")), ("b2", None)]);
        assert!(is_stable(&a, &b, &settled).unwrap());
    }

    #[test]
    fn test_validate_matching_rejects_missing_receiver() {
        let (a, b) = square();
        let partial = matching(&[("b1", Some("a1"))]);
        assert!(matches!(
            validate_matching(&a, &b, &partial),
            Err(MatchError::InvalidInput(InvalidInput::MatchingMismatch { .. }))
        ));
    }

    #[test]
    fn test_validate_matching_rejects_double_booking() {
        let (a, b) = square();
        let doubled = matching(&[("b1", Some("a1")), ("b2", Some("a1"))]);
        assert!(validate_matching(&a, &b, &doubled).is_err());
    }

    #[test]
    fn test_validate_matching_rejects_strangers() {
        let (a, b) = square();
        let stranger = matching(&[("b1", Some("a1")), ("b2", Some("zz"))]);
        assert!(validate_matching(&a, &b, &stranger).is_err());

        let wrong_key = matching(&[("b1", Some("a1")), ("b9", Some("a2"))]);
        assert!(validate_matching(&a, &b, &wrong_key).is_err());
    }
}
