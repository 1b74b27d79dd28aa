//! The result of a stable matching run.
//!
//! A [`Matching`] maps every group-B participant to a [`Partner`]. It is
//! ordered by group-B id, so iteration, serialization and the digest are
//! deterministic regardless of how the engine visited proposers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::{ParticipantId, Partner};

/// Pairing keyed by group-B participant.
///
/// ## Digest
///
/// [`Matching::digest`] is a SHA-256 hash over the sorted pairs. Two runs on
/// identical input must produce identical digests.
///
/// ## Example
///
/// ```
/// use stable_marriage::types::{Matching, Partner};
///
/// let matching = Matching::from_pairs([
///     ("b1", Partner::Matched("a1".into())),
///     ("b2", Partner::Unmatched),
/// ]);
///
/// assert_eq!(matching.partner_of("b1").and_then(Partner::id).map(|id| id.as_str()), Some("a1"));
/// assert_eq!(matching.matched_count(), 1);
/// assert_eq!(matching.digest_hex().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matching {
    pairs: BTreeMap<ParticipantId, Partner>,
}

impl Matching {
    /// Create an empty matching.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(group-B id, partner)` pairs. Later pairs overwrite earlier ones.
    pub fn from_pairs<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Partner)>,
        K: Into<ParticipantId>,
    {
        Self {
            pairs: pairs.into_iter().map(|(b, p)| (b.into(), p)).collect(),
        }
    }

    /// Assign `partner` to `receiver`, returning the previous partner.
    pub fn insert(&mut self, receiver: impl Into<ParticipantId>, partner: Partner) -> Option<Partner> {
        self.pairs.insert(receiver.into(), partner)
    }

    /// The partner held by group-B participant `receiver`.
    pub fn partner_of(&self, receiver: &str) -> Option<&Partner> {
        self.pairs.get(receiver)
    }

    /// The group-B participant holding group-A participant `proposer`.
    ///
    /// Linear in the size of the matching.
    pub fn receiver_of(&self, proposer: &str) -> Option<&ParticipantId> {
        self.pairs
            .iter()
            .find(|(_, partner)| partner.id().is_some_and(|id| id.as_str() == proposer))
            .map(|(receiver, _)| receiver)
    }

    /// Map from group-A id to group-B id for every real pair.
    pub fn inverse(&self) -> BTreeMap<&ParticipantId, &ParticipantId> {
        self.matched_pairs().map(|(b, a)| (a, b)).collect()
    }

    /// `(group-B, group-A)` for every real pair, ordered by group-B id.
    pub fn matched_pairs(&self) -> impl Iterator<Item = (&ParticipantId, &ParticipantId)> + '_ {
        self.pairs
            .iter()
            .filter_map(|(b, partner)| partner.id().map(|a| (b, a)))
    }

    /// Group-B participants holding nobody.
    pub fn unmatched(&self) -> impl Iterator<Item = &ParticipantId> + '_ {
        self.pairs
            .iter()
            .filter(|(_, partner)| !partner.is_matched())
            .map(|(b, _)| b)
    }

    /// All entries ordered by group-B id.
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &Partner)> + '_ {
        self.pairs.iter()
    }

    /// Number of group-B participants covered.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when nobody is covered.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of real pairs.
    pub fn matched_count(&self) -> usize {
        self.matched_pairs().count()
    }

    /// SHA-256 over the sorted pairs.
    ///
    /// Each entry is length-prefixed so that adjacent ids cannot alias, and
    /// unmatched entries carry a distinct tag from any real id.
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update((self.pairs.len() as u64).to_le_bytes());
        for (receiver, partner) in &self.pairs {
            update_str(&mut hasher, receiver.as_str());
            match partner {
                Partner::Matched(id) => {
                    hasher.update([1u8]);
                    update_str(&mut hasher, id.as_str());
                }
                Partner::Unmatched => hasher.update([0u8]),
            }
        }

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        digest
    }

    /// The digest as a hex string.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}

fn update_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

impl FromIterator<(ParticipantId, Partner)> for Matching {
    fn from_iter<T: IntoIterator<Item = (ParticipantId, Partner)>>(iter: T) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matching {
        Matching::from_pairs([
            ("b2", Partner::Matched("a1".into())),
            ("b1", Partner::Matched("a2".into())),
            ("b3", Partner::Unmatched),
        ])
    }

    #[test]
    fn test_iteration_is_sorted_by_receiver() {
        let matching = sample();
        let keys: Vec<&str> = matching.iter().map(|(b, _)| b.as_str()).collect();
        assert_eq!(keys, ["b1", "b2", "b3"]);
    }

    #[test]
    fn test_lookups() {
        let matching = sample();
        assert_eq!(matching.partner_of("b3"), Some(&Partner::Unmatched));
        assert_eq!(matching.receiver_of("a1").map(ParticipantId::as_str), Some("b2"));
        assert_eq!(matching.receiver_of("a9"), None);
        assert_eq!(matching.matched_count(), 2);

        let unmatched: Vec<&str> = matching.unmatched().map(ParticipantId::as_str).collect();
        assert_eq!(unmatched, ["b3"]);
    }

    #[test]
    fn test_inverse() {
        let matching = sample();
        let inverse = matching.inverse();
        assert_eq!(inverse.len(), 2);
        assert_eq!(inverse[&ParticipantId::from("a2")].as_str(), "b1");
    }

    #[test]
    fn test_digest_determinism() {
        let d1 = sample().digest();
        let d2 = sample().digest();
        assert_eq!(d1, d2);

        let mut other = sample();
        other.insert("b3", Partner::Matched("".into()));
        assert_ne!(d1, other.digest(), "empty-string partner must differ from unmatched");
    }

    #[test]
    fn test_digest_hex() {
        let hex = sample().digest_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"b1":"a2","b2":"a1","b3":null}"#);

        let back: Matching = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());
    }
}
