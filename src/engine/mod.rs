//! Stable matching engine.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: same tables and configuration always give the same matching
//! 2. **Owned working state**: caller tables are borrowed, never trimmed
//! 3. **Synchronous execution**: one call, one thread, cooperative cancellation only
//! 4. **Validate first**: malformed tables are rejected before any proposal
//!
//! ## Matching Rules
//!
//! - **Group A proposes** (group B when roles are reversed)
//! - **Receivers hold** the best suitor seen so far, starting from nobody
//! - **Displaced holders** continue proposing in the same chain
//! - **Result** is proposer-optimal and keyed by group B
//!
//! ## Example
//!
//! ```
//! use stable_marriage::engine::find_stable_matching;
//! use stable_marriage::types::{Partner, PreferenceTable};
//!
//! // Group A is smaller: one group-B participant stays unmatched.
//! let a = PreferenceTable::from_lists([("a1", ["b2", "b1"])]).unwrap();
//! let b = PreferenceTable::from_lists([("b1", ["a1"]), ("b2", ["a1"])]).unwrap();
//!
//! let matching = find_stable_matching(&a, &b).unwrap();
//! assert_eq!(matching.partner_of("b2"), Some(&Partner::Matched("a1".into())));
//! assert_eq!(matching.partner_of("b1"), Some(&Partner::Unmatched));
//! ```

pub mod cancel;
pub mod config;
pub mod matcher;
pub mod validate;

pub use cancel::{CancelFn, Cancellation, CancellationToken, Deadline, NeverCancel};
pub use config::MatcherConfig;
pub use matcher::{MatchResult, MatchStats, MatchingEngine};
pub use validate::validate;

use crate::error::Result;
use crate::types::{Matching, PreferenceTable};

/// Run a default engine (group A proposes, no cancellation) and return the matching.
pub fn find_stable_matching(group_a: &PreferenceTable, group_b: &PreferenceTable) -> Result<Matching> {
    MatchingEngine::new()
        .find_stable_matching(group_a, group_b)
        .map(|result| result.matching)
}
