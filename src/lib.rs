//! # Stable Marriage
//!
//! Stable matching between two groups via Knuth/Goldstein deferred acceptance.
//!
//! ## Architecture
//!
//! - **Types**: participant ids, the `Partner` sum type, preference tables, matchings
//! - **Engine**: validation plus the propose-and-reject loop, with cooperative cancellation
//! - **Analysis**: stability checks, blocking pairs and scores for any matching
//! - **Table**: CSV/JSON I/O and seeded random tables
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical tables always give identical matchings (and digests)
//! 2. **No sentinel values**: "unmatched" is `Partner::Unmatched`, never a reserved id
//! 3. **Owned working state**: the engine never mutates caller tables
//! 4. **Synchronous execution**: a single call on a single thread
//!
//! ## Example
//!
//! ```
//! use stable_marriage::{MatchingEngine, Partner, PreferenceTable};
//!
//! let a = PreferenceTable::from_lists([("a1", ["b1", "b2"]), ("a2", ["b1", "b2"])]).unwrap();
//! let b = PreferenceTable::from_lists([("b1", ["a1", "a2"]), ("b2", ["a2", "a1"])]).unwrap();
//!
//! let result = MatchingEngine::new().find_stable_matching(&a, &b).unwrap();
//! assert_eq!(result.matching.partner_of("b1"), Some(&Partner::Matched("a1".into())));
//! assert!(stable_marriage::analysis::is_stable(&a, &b, &result.matching).unwrap());
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: ParticipantId, Partner, PreferenceTable, Matching
pub mod types;

/// Error taxonomy: MatchError, InvalidInput, TableError
pub mod error;

/// Matching engine: deferred acceptance with an unmatched sentinel
pub mod engine;

/// Stability checks and scoring
pub mod analysis;

/// Table I/O and generation
pub mod table;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use types::{Matching, ParticipantId, Partner, PreferenceList, PreferenceTable};
pub use error::{Group, InvalidInput, MatchError, TableError};
pub use engine::{find_stable_matching, MatchResult, MatchStats, MatcherConfig, MatchingEngine};
