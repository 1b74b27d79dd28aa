//! Preference lists and tables.
//!
//! A [`PreferenceTable`] holds one ranked list per participant of a group,
//! most preferred first. Insertion order is preserved so that tables read
//! from disk are written back with the same column order; lookups by id go
//! through a side index.
//!
//! Tables are only structurally checked here (one list per owner). Whether
//! two tables are consistent with each other is decided by
//! [`crate::engine::validate`].

use std::collections::HashMap;

use crate::error::InvalidInput;
use crate::types::ParticipantId;

// ============================================================================
// PreferenceList
// ============================================================================

/// One participant's strict ranking of the opposite group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceList {
    /// Who holds these preferences.
    pub owner: ParticipantId,

    /// Counterparts, most preferred first.
    pub ranking: Vec<ParticipantId>,
}

impl PreferenceList {
    /// Create a list for `owner`.
    pub fn new<P>(owner: impl Into<ParticipantId>, ranking: impl IntoIterator<Item = P>) -> Self
    where
        P: Into<ParticipantId>,
    {
        Self {
            owner: owner.into(),
            ranking: ranking.into_iter().map(Into::into).collect(),
        }
    }

    /// Position of `candidate` in this ranking (0 = most preferred).
    ///
    /// Linear scan; hot paths build their own rank index instead.
    pub fn rank_of(&self, candidate: &str) -> Option<usize> {
        self.ranking.iter().position(|id| id.as_str() == candidate)
    }

    /// Number of ranked counterparts.
    pub fn len(&self) -> usize {
        self.ranking.len()
    }

    /// True when nobody is ranked.
    pub fn is_empty(&self) -> bool {
        self.ranking.is_empty()
    }
}

// ============================================================================
// PreferenceTable
// ============================================================================

/// Preference lists for every member of one group.
///
/// ## Example
///
/// ```
/// use stable_marriage::types::PreferenceTable;
///
/// let table = PreferenceTable::from_lists([
///     ("a1", ["b1", "b2"]),
///     ("a2", ["b2", "b1"]),
/// ]).unwrap();
///
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.get("a2").unwrap()[0].as_str(), "b2");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceTable {
    /// Lists in insertion order
    lists: Vec<PreferenceList>,

    /// Owner id to position in `lists`
    index: HashMap<ParticipantId, usize>,
}

impl PreferenceTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(owner, ranking)` pairs.
    ///
    /// Fails with [`InvalidInput::DuplicateParticipant`] if an owner repeats.
    pub fn from_lists<I, O, R, P>(lists: I) -> Result<Self, InvalidInput>
    where
        I: IntoIterator<Item = (O, R)>,
        O: Into<ParticipantId>,
        R: IntoIterator<Item = P>,
        P: Into<ParticipantId>,
    {
        let mut table = Self::new();
        for (owner, ranking) in lists {
            table.insert(PreferenceList::new(owner, ranking))?;
        }
        Ok(table)
    }

    /// Append a list. Owners must be unique within a table.
    pub fn insert(&mut self, list: PreferenceList) -> Result<(), InvalidInput> {
        if self.index.contains_key(&list.owner) {
            return Err(InvalidInput::DuplicateParticipant {
                participant: list.owner,
            });
        }
        self.index.insert(list.owner.clone(), self.lists.len());
        self.lists.push(list);
        Ok(())
    }

    /// The ranking held by `owner`, if present.
    pub fn get(&self, owner: &str) -> Option<&[ParticipantId]> {
        self.list(owner).map(|list| list.ranking.as_slice())
    }

    /// The full list held by `owner`, if present.
    pub fn list(&self, owner: &str) -> Option<&PreferenceList> {
        self.index.get(owner).map(|&i| &self.lists[i])
    }

    /// Position of `owner` in insertion order.
    pub fn position(&self, owner: &str) -> Option<usize> {
        self.index.get(owner).copied()
    }

    /// True if `owner` has a list in this table.
    pub fn contains(&self, owner: &str) -> bool {
        self.index.contains_key(owner)
    }

    /// Number of participants (lists) in the table.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// True when the table has no lists.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Owners in insertion order.
    pub fn participants(&self) -> impl Iterator<Item = &ParticipantId> + '_ {
        self.lists.iter().map(|list| &list.owner)
    }

    /// Lists in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, PreferenceList> {
        self.lists.iter()
    }

    /// Length of the longest list (the `L` in the `n·L` rejection bound).
    pub fn max_list_len(&self) -> usize {
        self.lists.iter().map(PreferenceList::len).max().unwrap_or(0)
    }
}

impl<'a> IntoIterator for &'a PreferenceTable {
    type Item = &'a PreferenceList;
    type IntoIter = std::slice::Iter<'a, PreferenceList>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
