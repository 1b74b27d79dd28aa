//! Core data types for stable matching.
//!
//! ## Types
//!
//! - [`ParticipantId`]: opaque identifier for one participant
//! - [`Partner`]: `Matched(id)` or `Unmatched`
//! - [`PreferenceList`]: one participant's ranking of the other group
//! - [`PreferenceTable`]: all rankings held by one group
//! - [`Matching`]: final pairing keyed by group-B participant

mod participant;
mod preference;
mod matching;

pub use participant::{ParticipantId, Partner};
pub use preference::{PreferenceList, PreferenceTable};
pub use matching::Matching;
