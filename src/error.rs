//! Error types for stable matching.
//!
//! [`MatchError`] is the engine's taxonomy: malformed input or an observed
//! cancellation. Neither is retried and neither carries a partial result.
//! [`TableError`] covers reading and writing tables on disk.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::ParticipantId;

/// Convenience alias for engine results.
pub type Result<T, E = MatchError> = std::result::Result<T, E>;

/// Which side of the market a participant belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    /// The proposing group in the default orientation.
    A,
    /// The receiving group; matchings are keyed by its members.
    B,
}

impl Group {
    /// Returns the opposite group.
    pub fn counterpart(self) -> Self {
        match self {
            Group::A => Group::B,
            Group::B => Group::A,
        }
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::A => f.write_str("group A"),
            Group::B => f.write_str("group B"),
        }
    }
}

/// Errors produced by the matching engine and the analysis helpers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// The preference tables (or a supplied matching) are malformed.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    /// An external cancellation signal was observed at a checkpoint.
    #[error("matching cancelled after {proposals} proposals")]
    Cancelled { proposals: u64 },
}

/// Ways the input to the engine can be malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    /// A list names someone who is not a key of the counterpart table.
    #[error("{group} participant '{participant}' ranks unknown participant '{unknown}'")]
    UnknownParticipant {
        group: Group,
        participant: ParticipantId,
        unknown: ParticipantId,
    },

    /// A list ranks the same counterpart twice.
    #[error("{group} participant '{participant}' ranks '{duplicate}' more than once")]
    DuplicateEntry {
        group: Group,
        participant: ParticipantId,
        duplicate: ParticipantId,
    },

    /// Two lists in one table share an owner.
    #[error("participant '{participant}' has more than one preference list")]
    DuplicateParticipant { participant: ParticipantId },

    /// A list does not rank every member of the counterpart group.
    #[error("{group} participant '{participant}' ranks {found} of {expected} counterparts")]
    IncompleteList {
        group: Group,
        participant: ParticipantId,
        expected: usize,
        found: usize,
    },

    /// More proposers than receivers; someone would run out of candidates.
    #[error("{proposers} proposers cannot all be placed with {receivers} receivers")]
    TooManyProposers { proposers: usize, receivers: usize },

    /// An explicit proposal order is not a permutation of the proposers.
    #[error("proposal order is not a permutation of the proposers: {reason}")]
    ProposalOrderMismatch { reason: String },

    /// A proposer was rejected by everyone on their list.
    #[error("participant '{participant}' exhausted their preference list")]
    ExhaustedPreferences { participant: ParticipantId },

    /// A matching does not correspond to the preference tables.
    #[error("matching does not fit the preference tables: {reason}")]
    MatchingMismatch { reason: String },
}

/// Errors reading or writing preference tables and matchings.
#[derive(Debug, Error)]
pub enum TableError {
    /// Failed to open or create a file.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV content, or a failed CSV write.
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Failed to encode a matching as JSON.
    #[error("failed to encode JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    /// A required header column is absent.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// A row has a cell past the last header column.
    #[error("row {row} of {path} has a cell in column {column}, past the {headers} header columns")]
    UnexpectedCell {
        path: PathBuf,
        row: usize,
        column: usize,
        headers: usize,
    },

    /// A matching file lists the same group-B participant twice.
    #[error("group-B participant '{receiver}' appears more than once in {path}")]
    DuplicateReceiver { path: PathBuf, receiver: ParticipantId },

    /// An empty group-A id cannot be written; it would read back as unmatched.
    #[error("cannot write {path}: '{receiver}' is matched to an empty id")]
    EmptyPartner { path: PathBuf, receiver: ParticipantId },

    /// The file parsed, but its content is not a valid table.
    #[error(transparent)]
    Invalid(#[from] InvalidInput),
}
