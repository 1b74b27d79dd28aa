//! Getting preference tables in and matchings out.
//!
//! The engine only sees parsed [`PreferenceTable`](crate::types::PreferenceTable)s.
//! This module is the glue around it:
//!
//! - [`io`]: column-oriented CSV tables, two-column CSV matchings, JSON matchings
//! - [`generate`]: seeded random tables for testing and benchmarking

pub mod generate;
pub mod io;

pub use generate::{participant_ids, random_preferences, seeded_preferences};
pub use io::{
    read_matching, read_preferences, write_matching, write_matching_json, write_matching_to,
    write_preferences,
};
