//! Matching scores.
//!
//! The score for a group is the sum, over matched pairs, of the rank each
//! member gives their partner (0 = first choice). Lower is better. Unmatched
//! participants contribute nothing and are counted separately.

use serde::Serialize;
use tracing::warn;

use crate::analysis::stability::blocking_pairs;
use crate::analysis::RankIndex;
use crate::error::Result;
use crate::types::{Matching, PreferenceTable};

/// Per-group rank sums for a matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchingScore {
    /// Sum of the ranks group A gives their partners.
    pub group_a: usize,

    /// Sum of the ranks group B gives their partners.
    pub group_b: usize,

    /// Group-B participants holding nobody.
    pub unmatched: usize,
}

impl MatchingScore {
    /// Combined rank sum over both groups.
    pub fn total(&self) -> usize {
        self.group_a + self.group_b
    }
}

/// Score `matching` against the tables.
///
/// Logs a warning when the matching is not stable; the score is still
/// returned.
///
/// # Example
///
/// ```
/// use stable_marriage::analysis::score_matching;
/// use stable_marriage::engine::find_stable_matching;
/// use stable_marriage::types::PreferenceTable;
///
/// let a = PreferenceTable::from_lists([("a1", ["b1", "b2"]), ("a2", ["b1", "b2"])]).unwrap();
/// let b = PreferenceTable::from_lists([("b1", ["a1", "a2"]), ("b2", ["a2", "a1"])]).unwrap();
///
/// let matching = find_stable_matching(&a, &b).unwrap();
/// let score = score_matching(&a, &b, &matching).unwrap();
/// assert_eq!(score.group_a, 1); // a2 got their second choice
/// assert_eq!(score.group_b, 0);
/// ```
pub fn score_matching(
    group_a: &PreferenceTable,
    group_b: &PreferenceTable,
    matching: &Matching,
) -> Result<MatchingScore> {
    let blocking = blocking_pairs(group_a, group_b, matching)?;
    if !blocking.is_empty() {
        warn!(blocking_pairs = blocking.len(), "scoring an unstable matching");
    }

    let a_ranks = RankIndex::new(group_a);
    let b_ranks = RankIndex::new(group_b);

    let mut score = MatchingScore::default();
    for (receiver, partner) in matching.iter() {
        let Some(proposer) = partner.id() else {
            score.unmatched += 1;
            continue;
        };
        // Validated above: both ranks exist.
        score.group_a += a_ranks.rank(proposer.as_str(), receiver.as_str()).unwrap_or(0);
        score.group_b += b_ranks.rank(receiver.as_str(), proposer.as_str()).unwrap_or(0);
    }

    Ok(score)
}
