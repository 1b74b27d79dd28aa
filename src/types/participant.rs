//! Participant identifiers and the partner sum type.
//!
//! An unmatched participant is represented by [`Partner::Unmatched`] rather
//! than a reserved identifier value, so every string (including the empty
//! string) is a legal [`ParticipantId`].

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// ParticipantId
// ============================================================================

/// Opaque identifier naming one participant within a group.
///
/// Borrows as `str`, so tables and matchings can be queried with plain
/// string slices.
///
/// ## Example
///
/// ```
/// use stable_marriage::types::ParticipantId;
///
/// let id = ParticipantId::from("alice");
/// assert_eq!(id.as_str(), "alice");
/// assert_eq!(id.to_string(), "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create an identifier from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identifier, returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ParticipantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ParticipantId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Partner
// ============================================================================

/// The partner held by a participant at the end of a run.
///
/// Serializes as an optional identifier: `"a1"` or `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<ParticipantId>", into = "Option<ParticipantId>")]
pub enum Partner {
    /// Paired with a real participant from the other group.
    Matched(ParticipantId),
    /// Holding nobody.
    #[default]
    Unmatched,
}

impl Partner {
    /// Returns the partner's identifier, if any.
    pub fn id(&self) -> Option<&ParticipantId> {
        match self {
            Partner::Matched(id) => Some(id),
            Partner::Unmatched => None,
        }
    }

    /// True when paired with a real participant.
    pub fn is_matched(&self) -> bool {
        matches!(self, Partner::Matched(_))
    }
}

impl From<Option<ParticipantId>> for Partner {
    fn from(id: Option<ParticipantId>) -> Self {
        match id {
            Some(id) => Partner::Matched(id),
            None => Partner::Unmatched,
        }
    }
}

impl From<Partner> for Option<ParticipantId> {
    fn from(partner: Partner) -> Self {
        match partner {
            Partner::Matched(id) => Some(id),
            Partner::Unmatched => None,
        }
    }
}

impl fmt::Display for Partner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partner::Matched(id) => write!(f, "{id}"),
            Partner::Unmatched => f.write_str("(unmatched)"),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_empty_string_is_a_real_id() {
        let empty = Partner::Matched(ParticipantId::from(""));
        assert!(empty.is_matched());
        assert_ne!(empty, Partner::Unmatched);
    }

    #[test]
    fn test_borrow_lookup() {
        let mut set = HashSet::new();
        set.insert(ParticipantId::from("b1"));
        assert!(set.contains("b1"));
        assert!(!set.contains("b2"));
    }

    #[test]
    fn test_partner_option_conversion() {
        let some: Option<ParticipantId> = Partner::Matched("a1".into()).into();
        assert_eq!(some, Some(ParticipantId::from("a1")));
        assert_eq!(Partner::from(None), Partner::Unmatched);
    }

    #[test]
    fn test_partner_serde() {
        let matched = serde_json::to_string(&Partner::Matched("a1".into())).unwrap();
        assert_eq!(matched, "\"a1\"");
        let unmatched = serde_json::to_string(&Partner::Unmatched).unwrap();
        assert_eq!(unmatched, "null");

        let back: Partner = serde_json::from_str("null").unwrap();
        assert_eq!(back, Partner::Unmatched);
    }

    #[test]
    fn test_partner_display() {
        assert_eq!(Partner::Matched("a1".into()).to_string(), "a1");
        assert_eq!(Partner::Unmatched.to_string(), "(unmatched)");
    }
}
