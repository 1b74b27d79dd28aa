//! Deferred acceptance with an unmatched sentinel.
//!
//! ## Algorithm
//!
//! Every receiver starts out holding nobody ([`Partner::Unmatched`]), which
//! they rank below every real proposer. Proposers are taken one at a time
//! and each starts a *chain*:
//!
//! ```text
//! active = proposer
//! while active is a real participant:
//!     r = front of active's remaining list
//!     if r ranks active above r's current holder h:
//!         r holds active; active = h        (h may be Unmatched: chain ends)
//!     if active is real:
//!         pop r from active's list          (rejected or displaced by r)
//! ```
//!
//! A displaced holder's list still has `r` at the front (they were accepted
//! there and never advanced), so popping the front removes exactly `r`.
//!
//! ## Termination
//!
//! Every iteration either ends the chain or pops one entry from some
//! proposer's list. Lists are never refilled, so the number of rejections is
//! bounded by `proposers × longest list`. [`MatchStats::rejection_bound`]
//! carries that bound for the run.
//!
//! ## Working State
//!
//! Inputs are borrowed. The engine interns ids to table positions and owns
//! its own per-proposer `VecDeque`s, a receiver rank table and the held
//! partner per receiver; nothing is shared with the caller.

use std::collections::VecDeque;

use tracing::{debug, debug_span, trace, warn};

use crate::engine::cancel::{Cancellation, NeverCancel};
use crate::engine::config::MatcherConfig;
use crate::engine::validate::{resolve_order, validate_oriented};
use crate::error::{Group, InvalidInput, MatchError, Result};
use crate::types::{Matching, ParticipantId, Partner, PreferenceTable};

/// Counters collected during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchStats {
    /// Proposals made (accepted or not).
    pub proposals: u64,

    /// Entries popped from proposer lists.
    pub rejections: u64,

    /// Chains started (one per proposer).
    pub chains: u64,

    /// Proposals in the longest single chain.
    pub longest_chain: u64,

    /// Upper bound on `rejections`: proposers × longest proposer list.
    pub rejection_bound: u64,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Final pairing keyed by group-B participant.
    pub matching: Matching,

    /// Counters from the run.
    pub stats: MatchStats,
}

/// Stable matching engine.
///
/// The engine is stateless between runs; one instance may be reused for
/// any number of calls.
#[derive(Debug, Clone, Default)]
pub struct MatchingEngine<C = NeverCancel> {
    config: MatcherConfig,
    cancel: C,
}

impl MatchingEngine<NeverCancel> {
    /// Engine with default configuration and no cancellation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with `config` and no cancellation.
    pub fn with_config(config: MatcherConfig) -> Self {
        Self {
            config,
            cancel: NeverCancel,
        }
    }
}

impl<C: Cancellation> MatchingEngine<C> {
    /// Replace the cancellation hook.
    pub fn with_cancellation<D: Cancellation>(self, cancel: D) -> MatchingEngine<D> {
        MatchingEngine {
            config: self.config,
            cancel,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Compute the proposer-optimal stable matching.
    ///
    /// Proposers are visited in table insertion order.
    ///
    /// # Errors
    ///
    /// * [`MatchError::InvalidInput`] if the tables are inconsistent.
    /// * [`MatchError::Cancelled`] if the hook fires at a checkpoint.
    ///
    /// # Example
    ///
    /// ```
    /// use stable_marriage::engine::MatchingEngine;
    /// use stable_marriage::types::{Partner, PreferenceTable};
    ///
    /// let a = PreferenceTable::from_lists([
    ///     ("a1", ["b1", "b2"]),
    ///     ("a2", ["b1", "b2"]),
    /// ]).unwrap();
    /// let b = PreferenceTable::from_lists([
    ///     ("b1", ["a1", "a2"]),
    ///     ("b2", ["a2", "a1"]),
    /// ]).unwrap();
    ///
    /// let result = MatchingEngine::new().find_stable_matching(&a, &b).unwrap();
    /// assert_eq!(result.matching.partner_of("b1"), Some(&Partner::Matched("a1".into())));
    /// assert_eq!(result.matching.partner_of("b2"), Some(&Partner::Matched("a2".into())));
    /// ```
    pub fn find_stable_matching(
        &self,
        group_a: &PreferenceTable,
        group_b: &PreferenceTable,
    ) -> Result<MatchResult> {
        self.solve(group_a, group_b, None)
    }

    /// Like [`find_stable_matching`](Self::find_stable_matching), visiting
    /// proposers in `order`.
    ///
    /// `order` must be a permutation of the proposing group: group A
    /// normally, group B when roles are reversed. The final matching does
    /// not depend on the order.
    pub fn find_stable_matching_in_order(
        &self,
        group_a: &PreferenceTable,
        group_b: &PreferenceTable,
        order: &[ParticipantId],
    ) -> Result<MatchResult> {
        self.solve(group_a, group_b, Some(order))
    }

    fn solve(
        &self,
        group_a: &PreferenceTable,
        group_b: &PreferenceTable,
        order: Option<&[ParticipantId]>,
    ) -> Result<MatchResult> {
        let proposing = if self.config.reverse_roles { Group::B } else { Group::A };
        let (proposers, receivers) = match proposing {
            Group::A => (group_a, group_b),
            Group::B => (group_b, group_a),
        };

        let _span = debug_span!(
            "stable_matching",
            proposers = proposers.len(),
            receivers = receivers.len(),
            proposing = %proposing
        )
        .entered();

        validate_oriented(group_a, group_b, proposing)?;
        let order = match order {
            Some(order) => resolve_order(proposers, order)?,
            None => (0..proposers.len()).collect(),
        };

        let mut state = Workspace::build(proposers, receivers, proposing)?;
        let stats = self.run(&mut state, &order, proposers)?;

        debug!(
            proposals = stats.proposals,
            rejections = stats.rejections,
            longest_chain = stats.longest_chain,
            "stable matching complete"
        );

        let matching = match proposing {
            Group::A => state.keyed_by_receiver(proposers, receivers),
            Group::B => state.keyed_by_proposer(proposers, receivers),
        };

        Ok(MatchResult { matching, stats })
    }

    /// The proposal/rejection loop.
    fn run(&self, state: &mut Workspace, order: &[usize], proposers: &PreferenceTable) -> Result<MatchStats> {
        let mut stats = MatchStats {
            rejection_bound: (proposers.len() * proposers.max_list_len()) as u64,
            ..MatchStats::default()
        };

        for &start in order {
            stats.chains += 1;
            let mut chain_len = 0u64;
            let mut active = Some(start);

            while let Some(proposer) = active {
                if self.config.is_checkpoint(stats.proposals) && self.cancel.is_cancelled() {
                    warn!(proposals = stats.proposals, "stable matching cancelled");
                    return Err(MatchError::Cancelled {
                        proposals: stats.proposals,
                    });
                }

                let receiver = match state.queues[proposer].front() {
                    Some(&receiver) => receiver,
                    None => {
                        return Err(InvalidInput::ExhaustedPreferences {
                            participant: owner(proposers, proposer),
                        }
                        .into())
                    }
                };
                stats.proposals += 1;
                chain_len += 1;

                let holder = state.held[receiver];
                if state.prefers(receiver, proposer, holder) {
                    trace!(proposer, receiver, displaced = ?holder, "proposal accepted");
                    state.held[receiver] = Some(proposer);
                    active = holder;
                } else {
                    trace!(proposer, receiver, "proposal rejected");
                }

                if let Some(rejected) = active {
                    state.queues[rejected].pop_front();
                    stats.rejections += 1;
                }
            }

            stats.longest_chain = stats.longest_chain.max(chain_len);
        }

        Ok(stats)
    }
}

fn owner(table: &PreferenceTable, position: usize) -> ParticipantId {
    table
        .iter()
        .nth(position)
        .map(|list| list.owner.clone())
        .unwrap_or_default()
}

/// Interned working copy of both tables.
struct Workspace {
    /// Per proposer: remaining receivers, most preferred at the front.
    queues: Vec<VecDeque<usize>>,

    /// Per receiver: rank of each proposer (`usize::MAX` if unranked).
    ranks: Vec<Vec<usize>>,

    /// Per receiver: rank given to holding nobody (one past the list).
    unmatched_rank: Vec<usize>,

    /// Per receiver: the proposer currently held.
    held: Vec<Option<usize>>,
}

impl Workspace {
    fn build(
        proposers: &PreferenceTable,
        receivers: &PreferenceTable,
        proposing: Group,
    ) -> Result<Self, InvalidInput> {
        let queues = proposers
            .iter()
            .map(|list| {
                list.ranking
                    .iter()
                    .map(|id| intern(receivers, id, &list.owner, proposing))
                    .collect::<Result<VecDeque<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut ranks = Vec::with_capacity(receivers.len());
        let mut unmatched_rank = Vec::with_capacity(receivers.len());
        for list in receivers {
            let mut row = vec![usize::MAX; proposers.len()];
            for (rank, id) in list.ranking.iter().enumerate() {
                row[intern(proposers, id, &list.owner, proposing.counterpart())?] = rank;
            }
            ranks.push(row);
            unmatched_rank.push(list.len());
        }

        Ok(Self {
            queues,
            ranks,
            unmatched_rank,
            held: vec![None; receivers.len()],
        })
    }

    /// Does `receiver` rank `suitor` above `holder`?
    #[inline]
    fn prefers(&self, receiver: usize, suitor: usize, holder: Option<usize>) -> bool {
        let current = match holder {
            Some(h) => self.ranks[receiver][h],
            None => self.unmatched_rank[receiver],
        };
        self.ranks[receiver][suitor] < current
    }

    /// Receivers are group B: each held proposer is their partner.
    fn keyed_by_receiver(&self, proposers: &PreferenceTable, receivers: &PreferenceTable) -> Matching {
        let proposer_ids: Vec<&ParticipantId> = proposers.participants().collect();
        receivers
            .participants()
            .zip(&self.held)
            .map(|(receiver, held)| {
                let partner = held.map_or(Partner::Unmatched, |p| Partner::Matched(proposer_ids[p].clone()));
                (receiver.clone(), partner)
            })
            .collect()
    }

    /// Proposers are group B: invert the held pairs and fill in the rest.
    fn keyed_by_proposer(&self, proposers: &PreferenceTable, receivers: &PreferenceTable) -> Matching {
        let proposer_ids: Vec<&ParticipantId> = proposers.participants().collect();
        let mut matching: Matching = proposers
            .participants()
            .map(|id| (id.clone(), Partner::Unmatched))
            .collect();
        for (receiver, held) in receivers.participants().zip(&self.held) {
            if let Some(p) = *held {
                matching.insert(proposer_ids[p].clone(), Partner::Matched(receiver.clone()));
            }
        }
        matching
    }
}

/// Position of `id` in `table`, ranked by `ranked_by` of `group`.
fn intern(
    table: &PreferenceTable,
    id: &ParticipantId,
    ranked_by: &ParticipantId,
    group: Group,
) -> Result<usize, InvalidInput> {
    table
        .position(id.as_str())
        .ok_or_else(|| InvalidInput::UnknownParticipant {
            group,
            participant: ranked_by.clone(),
            unknown: id.clone(),
        })
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::cancel::{CancelFn, CancellationToken};
    use std::cell::Cell;

    fn table(lists: &[(&str, &[&str])]) -> PreferenceTable {
        PreferenceTable::from_lists(lists.iter().map(|(owner, ranking)| (*owner, ranking.iter().copied())))
            .unwrap()
    }

    fn matched(id: &str) -> Partner {
        Partner::Matched(id.into())
    }

    #[test]
    fn test_both_first_choices() {
        let a = table(&[("a1", &["b1", "b2"]), ("a2", &["b1", "b2"])]);
        let b = table(&[("b1", &["a1", "a2"]), ("b2", &["a2", "a1"])]);

        let result = MatchingEngine::new().find_stable_matching(&a, &b).unwrap();
        assert_eq!(result.matching.partner_of("b1"), Some(&matched("a1")));
        assert_eq!(result.matching.partner_of("b2"), Some(&matched("a2")));
        assert_eq!(result.stats.proposals, 3);
        assert_eq!(result.stats.rejections, 1);
    }

    #[test]
    fn test_unequal_sizes_leave_receiver_unmatched() {
        let a = table(&[("a1", &["b2", "b1"])]);
        let b = table(&[("b1", &["a1"]), ("b2", &["a1"])]);

        let result = MatchingEngine::new().find_stable_matching(&a, &b).unwrap();
        assert_eq!(result.matching.partner_of("b2"), Some(&matched("a1")));
        assert_eq!(result.matching.partner_of("b1"), Some(&Partner::Unmatched));
        assert_eq!(result.matching.len(), 2);
    }

    #[test]
    fn test_displaced_holder_continues_chain() {
        // a1 takes b1, then a2 displaces a1, who moves on to b2.
        let a = table(&[("a1", &["b1", "b2"]), ("a2", &["b1", "b2"])]);
        let b = table(&[("b1", &["a2", "a1"]), ("b2", &["a1", "a2"])]);

        let result = MatchingEngine::new().find_stable_matching(&a, &b).unwrap();
        assert_eq!(result.matching.partner_of("b1"), Some(&matched("a2")));
        assert_eq!(result.matching.partner_of("b2"), Some(&matched("a1")));
        assert_eq!(result.stats.chains, 2);
        assert_eq!(result.stats.longest_chain, 2);
    }

    #[test]
    fn test_knuth_unique_instance() {
        // Every proposer's first choice is distinct, so the matching is forced.
        let a = table(&[
            ("A", &["a", "b", "c"]),
            ("B", &["b", "c", "a"]),
            ("C", &["c", "a", "b"]),
        ]);
        let b = table(&[
            ("a", &["A", "B", "C"]),
            ("b", &["B", "C", "A"]),
            ("c", &["C", "A", "B"]),
        ]);

        let result = MatchingEngine::new().find_stable_matching(&a, &b).unwrap();
        let pairs: Vec<(&str, &str)> = result
            .matching
            .matched_pairs()
            .map(|(b, a)| (b.as_str(), a.as_str()))
            .collect();
        assert_eq!(pairs, [("a", "A"), ("b", "B"), ("c", "C")]);
        assert_eq!(result.stats.rejections, 0);
    }

    #[test]
    fn test_proposer_optimal_over_receiver_optimal() {
        // Two stable matchings exist; proposers get their first choices.
        let a = table(&[("a1", &["b1", "b2"]), ("a2", &["b2", "b1"])]);
        let b = table(&[("b1", &["a2", "a1"]), ("b2", &["a1", "a2"])]);

        let forward = MatchingEngine::new().find_stable_matching(&a, &b).unwrap();
        assert_eq!(forward.matching.partner_of("b1"), Some(&matched("a1")));
        assert_eq!(forward.matching.partner_of("b2"), Some(&matched("a2")));

        let reversed = MatchingEngine::with_config(MatcherConfig::default().with_reverse_roles(true))
            .find_stable_matching(&a, &b)
            .unwrap();
        assert_eq!(reversed.matching.partner_of("b1"), Some(&matched("a2")));
        assert_eq!(reversed.matching.partner_of("b2"), Some(&matched("a1")));
    }

    #[test]
    fn test_reverse_roles_stays_keyed_by_group_b() {
        // Group B is smaller and proposes; the leftover group-A member is absent.
        let a = table(&[("a1", &["b1"]), ("a2", &["b1"])]);
        let b = table(&[("b1", &["a2", "a1"])]);

        let config = MatcherConfig::default().with_reverse_roles(true);
        let result = MatchingEngine::with_config(config).find_stable_matching(&a, &b).unwrap();
        assert_eq!(result.matching.len(), 1);
        assert_eq!(result.matching.partner_of("b1"), Some(&matched("a2")));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let a = table(&[("a1", &["b1", "b2"]), ("a2", &["b1", "b2"])]);
        let b = table(&[("b1", &["a2", "a1"]), ("b2", &["a1", "a2"])]);
        let (a_before, b_before) = (a.clone(), b.clone());

        MatchingEngine::new().find_stable_matching(&a, &b).unwrap();
        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
    }

    #[test]
    fn test_invalid_input_propagates() {
        let a = table(&[("a1", &["b1", "b2"])]);
        let b = table(&[("b1", &["a1"])]);
        let err = MatchingEngine::new().find_stable_matching(&a, &b).unwrap_err();
        assert!(matches!(
            err,
            MatchError::InvalidInput(InvalidInput::UnknownParticipant { .. })
        ));
    }

    #[test]
    fn test_explicit_order() {
        let a = table(&[("a1", &["b1", "b2"]), ("a2", &["b1", "b2"])]);
        let b = table(&[("b1", &["a2", "a1"]), ("b2", &["a1", "a2"])]);
        let engine = MatchingEngine::new();

        let default = engine.find_stable_matching(&a, &b).unwrap();
        let order: Vec<ParticipantId> = vec!["a2".into(), "a1".into()];
        let reordered = engine.find_stable_matching_in_order(&a, &b, &order).unwrap();

        assert_eq!(default.matching, reordered.matching);
        assert_eq!(reordered.stats.chains, 2);
    }

    #[test]
    fn test_cancelled_before_first_proposal() {
        let a = table(&[("a1", &["b1"])]);
        let b = table(&[("b1", &["a1"])]);
        let token = CancellationToken::new();
        token.cancel();

        let err = MatchingEngine::new()
            .with_cancellation(token)
            .find_stable_matching(&a, &b)
            .unwrap_err();
        assert_eq!(err, MatchError::Cancelled { proposals: 0 });
    }

    #[test]
    fn test_cancelled_mid_run() {
        let a = table(&[("a1", &["b1", "b2"]), ("a2", &["b1", "b2"])]);
        let b = table(&[("b1", &["a2", "a1"]), ("b2", &["a1", "a2"])]);
        let polls = Cell::new(0u32);
        let hook = CancelFn(|| {
            polls.set(polls.get() + 1);
            polls.get() > 2
        });

        let err = MatchingEngine::new()
            .with_cancellation(hook)
            .find_stable_matching(&a, &b)
            .unwrap_err();
        assert_eq!(err, MatchError::Cancelled { proposals: 2 });
    }

    #[test]
    fn test_checkpoint_interval_zero_never_polls() {
        let a = table(&[("a1", &["b1"])]);
        let b = table(&[("b1", &["a1"])]);
        let engine = MatchingEngine::with_config(MatcherConfig::default().with_checkpoint_interval(0))
            .with_cancellation(CancelFn(|| true));
        assert!(engine.find_stable_matching(&a, &b).is_ok());
    }

    #[test]
    fn test_empty_groups() {
        let result = MatchingEngine::new()
            .find_stable_matching(&PreferenceTable::new(), &PreferenceTable::new())
            .unwrap();
        assert!(result.matching.is_empty());
        assert_eq!(result.stats, MatchStats::default());
    }

    #[test]
    fn test_rejections_within_bound() {
        let a = table(&[
            ("a1", &["b1", "b2", "b3"]),
            ("a2", &["b1", "b3", "b2"]),
            ("a3", &["b1", "b2", "b3"]),
        ]);
        let b = table(&[
            ("b1", &["a3", "a2", "a1"]),
            ("b2", &["a1", "a3", "a2"]),
            ("b3", &["a2", "a1", "a3"]),
        ]);
        let stats = MatchingEngine::new().find_stable_matching(&a, &b).unwrap().stats;
        assert_eq!(stats.rejection_bound, 9);
        assert!(stats.rejections <= stats.rejection_bound);
        assert_eq!(stats.proposals, stats.rejections + 3);
    }

    #[test]
    fn test_exhausted_list_without_validation() {
        // b1 never ranked a2, so a2 is turned away and has nowhere left to go.
        let a = table(&[("a1", &["b1"]), ("a2", &["b1"])]);
        let b = table(&[("b1", &["a1"])]);

        let mut state = Workspace::build(&a, &b, Group::A).unwrap();
        let err = MatchingEngine::new().run(&mut state, &[0, 1], &a).unwrap_err();
        assert_eq!(
            err,
            MatchError::InvalidInput(InvalidInput::ExhaustedPreferences {
                participant: "a2".into(),
            })
        );
    }

    #[test]
    fn test_empty_list_without_validation() {
        let a = table(&[("a1", &[])]);
        let b = table(&[("b1", &["a1"])]);

        let mut state = Workspace::build(&a, &b, Group::A).unwrap();
        let err = MatchingEngine::new().run(&mut state, &[0], &a).unwrap_err();
        assert!(matches!(
            err,
            MatchError::InvalidInput(InvalidInput::ExhaustedPreferences { participant }) if participant.as_str() == "a1"
        ));
    }
}
