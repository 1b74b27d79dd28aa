//! Post-hoc analysis of matchings.
//!
//! These helpers work on any [`Matching`](crate::types::Matching), whether
//! it came from the engine, from disk or was built by hand:
//!
//! - [`validate_matching`]: does the matching fit the tables?
//! - [`blocking_pairs`] / [`is_stable`]: stability check
//! - [`score_matching`]: per-group rank sums

pub mod score;
pub mod stability;

pub use score::{score_matching, MatchingScore};
pub use stability::{blocking_pairs, is_stable, validate_matching, BlockingPair};

use std::collections::HashMap;

use crate::types::PreferenceTable;

/// Rank lookup for every `(owner, candidate)` pair of a table.
pub(crate) struct RankIndex<'a> {
    ranks: HashMap<&'a str, HashMap<&'a str, usize>>,
}

impl<'a> RankIndex<'a> {
    pub(crate) fn new(table: &'a PreferenceTable) -> Self {
        let ranks = table
            .iter()
            .map(|list| {
                let row = list
                    .ranking
                    .iter()
                    .enumerate()
                    .map(|(rank, id)| (id.as_str(), rank))
                    .collect();
                (list.owner.as_str(), row)
            })
            .collect();
        Self { ranks }
    }

    /// Rank `owner` gives `candidate`.
    pub(crate) fn rank(&self, owner: &str, candidate: &str) -> Option<usize> {
        self.ranks.get(owner)?.get(candidate).copied()
    }

    /// Does `owner` rank `x` strictly above `y`? Unranked counts as last.
    pub(crate) fn prefers(&self, owner: &str, x: &str, y: &str) -> bool {
        let x = self.rank(owner, x).unwrap_or(usize::MAX);
        let y = self.rank(owner, y).unwrap_or(usize::MAX);
        x < y
    }
}
