//! Up-front validation of preference tables.
//!
//! The engine refuses to start on malformed input rather than surfacing the
//! problem halfway through a run. A pair of tables is valid when:
//!
//! 1. every ranked id is a key of the counterpart table,
//! 2. no list ranks the same counterpart twice,
//! 3. every list ranks the whole counterpart group,
//! 4. the proposing group is no larger than the receiving group.
//!
//! Rule 4 is checked against the proposing orientation, so reversing roles
//! flips which group may be the larger one.

use std::collections::HashSet;

use crate::error::{Group, InvalidInput};
use crate::types::{ParticipantId, PreferenceTable};

/// Validate `group_a` and `group_b` for a run where group A proposes.
///
/// # Example
///
/// ```
/// use stable_marriage::engine::validate;
/// use stable_marriage::types::PreferenceTable;
///
/// let a = PreferenceTable::from_lists([("a1", ["b1"])]).unwrap();
/// let b = PreferenceTable::from_lists([("b1", ["a1"])]).unwrap();
/// assert!(validate(&a, &b).is_ok());
/// ```
pub fn validate(group_a: &PreferenceTable, group_b: &PreferenceTable) -> Result<(), InvalidInput> {
    validate_oriented(group_a, group_b, Group::A)
}

/// Validate with an explicit proposing group.
pub(crate) fn validate_oriented(
    group_a: &PreferenceTable,
    group_b: &PreferenceTable,
    proposing: Group,
) -> Result<(), InvalidInput> {
    check_consistency(group_a, group_b)?;

    let (proposers, receivers) = match proposing {
        Group::A => (group_a.len(), group_b.len()),
        Group::B => (group_b.len(), group_a.len()),
    };
    if proposers > receivers {
        return Err(InvalidInput::TooManyProposers { proposers, receivers });
    }

    Ok(())
}

/// Rules 1 to 3: the two tables describe the same pair of groups.
pub(crate) fn check_consistency(group_a: &PreferenceTable, group_b: &PreferenceTable) -> Result<(), InvalidInput> {
    check_lists(group_a, Group::A, group_b)?;
    check_lists(group_b, Group::B, group_a)
}

/// Check every list in `table` (owned by `group`) against `counterpart`.
fn check_lists(
    table: &PreferenceTable,
    group: Group,
    counterpart: &PreferenceTable,
) -> Result<(), InvalidInput> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(counterpart.len());

    for list in table {
        seen.clear();
        for candidate in &list.ranking {
            if !counterpart.contains(candidate.as_str()) {
                return Err(InvalidInput::UnknownParticipant {
                    group,
                    participant: list.owner.clone(),
                    unknown: candidate.clone(),
                });
            }
            if !seen.insert(candidate.as_str()) {
                return Err(InvalidInput::DuplicateEntry {
                    group,
                    participant: list.owner.clone(),
                    duplicate: candidate.clone(),
                });
            }
        }

        // Known and distinct, so a short list is a missing counterpart.
        if list.len() != counterpart.len() {
            return Err(InvalidInput::IncompleteList {
                group,
                participant: list.owner.clone(),
                expected: counterpart.len(),
                found: list.len(),
            });
        }
    }

    Ok(())
}

/// Resolve an explicit proposal order into table positions.
///
/// The order must name every proposer exactly once.
pub(crate) fn resolve_order(
    proposers: &PreferenceTable,
    order: &[ParticipantId],
) -> Result<Vec<usize>, InvalidInput> {
    if order.len() != proposers.len() {
        return Err(InvalidInput::ProposalOrderMismatch {
            reason: format!("expected {} proposers, got {}", proposers.len(), order.len()),
        });
    }

    let mut seen = vec![false; proposers.len()];
    order
        .iter()
        .map(|id| {
            let position = proposers
                .position(id.as_str())
                .ok_or_else(|| InvalidInput::ProposalOrderMismatch {
                    reason: format!("'{id}' is not a proposer"),
                })?;
            if std::mem::replace(&mut seen[position], true) {
                return Err(InvalidInput::ProposalOrderMismatch {
                    reason: format!("'{id}' appears more than once"),
                });
            }
            Ok(position)
        })
        .collect()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn table(lists: &[(&str, &[&str])]) -> PreferenceTable {
        PreferenceTable::from_lists(lists.iter().map(|(owner, ranking)| (*owner, ranking.iter().copied())))
            .unwrap()
    }

    #[test]
    fn test_valid_square() {
        let a = table(&[("a1", &["b1", "b2"]), ("a2", &["b2", "b1"])]);
        let b = table(&[("b1", &["a1", "a2"]), ("b2", &["a2", "a1"])]);
        assert_eq!(validate(&a, &b), Ok(()));
    }

    #[test]
    fn test_unknown_participant() {
        let a = table(&[("a1", &["b9"])]);
        let b = table(&[("b1", &["a1"])]);
        assert_eq!(
            validate(&a, &b),
            Err(InvalidInput::UnknownParticipant {
                group: Group::A,
                participant: "a1".into(),
                unknown: "b9".into(),
            })
        );
    }

    #[test]
    fn test_unknown_participant_in_group_b() {
        let a = table(&[("a1", &["b1"])]);
        let b = table(&[("b1", &["a7"])]);
        assert!(matches!(
            validate(&a, &b),
            Err(InvalidInput::UnknownParticipant { group: Group::B, .. })
        ));
    }

    #[test]
    fn test_duplicate_entry() {
        let a = table(&[("a1", &["b1", "b1"])]);
        let b = table(&[("b1", &["a1"]), ("b2", &["a1"])]);
        assert_eq!(
            validate(&a, &b),
            Err(InvalidInput::DuplicateEntry {
                group: Group::A,
                participant: "a1".into(),
                duplicate: "b1".into(),
            })
        );
    }

    #[test]
    fn test_incomplete_list() {
        let a = table(&[("a1", &["b1"])]);
        let b = table(&[("b1", &["a1"]), ("b2", &["a1"])]);
        assert_eq!(
            validate(&a, &b),
            Err(InvalidInput::IncompleteList {
                group: Group::A,
                participant: "a1".into(),
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn test_too_many_proposers() {
        let a = table(&[("a1", &["b1"]), ("a2", &["b1"])]);
        let b = table(&[("b1", &["a1", "a2"])]);
        assert_eq!(
            validate(&a, &b),
            Err(InvalidInput::TooManyProposers { proposers: 2, receivers: 1 })
        );
        // Group B proposing is fine in this shape.
        assert_eq!(validate_oriented(&a, &b, Group::B), Ok(()));
    }

    #[test]
    fn test_empty_tables_are_valid() {
        assert_eq!(validate(&PreferenceTable::new(), &PreferenceTable::new()), Ok(()));
    }

    #[test]
    fn test_resolve_order() {
        let a = table(&[("a1", &[]), ("a2", &[]), ("a3", &[])]);
        let order: Vec<ParticipantId> = vec!["a3".into(), "a1".into(), "a2".into()];
        assert_eq!(resolve_order(&a, &order), Ok(vec![2, 0, 1]));
    }

    #[test]
    fn test_resolve_order_rejects_bad_permutations() {
        let a = table(&[("a1", &[]), ("a2", &[])]);

        let short: Vec<ParticipantId> = vec!["a1".into()];
        assert!(resolve_order(&a, &short).is_err());

        let repeated: Vec<ParticipantId> = vec!["a1".into(), "a1".into()];
        assert!(resolve_order(&a, &repeated).is_err());

        let unknown: Vec<ParticipantId> = vec!["a1".into(), "zz".into()];
        assert!(resolve_order(&a, &unknown).is_err());
    }
}
