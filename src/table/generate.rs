//! Random preference tables.
//!
//! Every participant ranks the whole counterpart group in a uniformly
//! random order. Seeded generation uses `ChaCha8Rng`, so the same seed
//! always yields the same pair of tables on every platform.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::InvalidInput;
use crate::types::{ParticipantId, PreferenceList, PreferenceTable};

/// Ids `{prefix}0 .. {prefix}{count-1}`.
pub fn participant_ids(prefix: &str, count: usize) -> Vec<ParticipantId> {
    (0..count).map(|i| ParticipantId::new(format!("{prefix}{i}"))).collect()
}

/// Random complete tables for the given groups.
///
/// Fails if either group repeats an id.
pub fn random_preferences<R: Rng + ?Sized>(
    group_a: &[ParticipantId],
    group_b: &[ParticipantId],
    rng: &mut R,
) -> Result<(PreferenceTable, PreferenceTable), InvalidInput> {
    let prefs_a = random_table(group_a, group_b, &mut *rng)?;
    let prefs_b = random_table(group_b, group_a, rng)?;
    Ok((prefs_a, prefs_b))
}

/// Seeded tables with ids `a0..` (group A) and `b0..` (group B).
///
/// # Example
///
/// ```
/// use stable_marriage::table::seeded_preferences;
///
/// let (a, b) = seeded_preferences(4, 4, 5).unwrap();
/// let (a2, b2) = seeded_preferences(4, 4, 5).unwrap();
/// assert_eq!((a, b), (a2, b2));
/// ```
pub fn seeded_preferences(
    size_a: usize,
    size_b: usize,
    seed: u64,
) -> Result<(PreferenceTable, PreferenceTable), InvalidInput> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    random_preferences(
        &participant_ids("a", size_a),
        &participant_ids("b", size_b),
        &mut rng,
    )
}

fn random_table<R: Rng + ?Sized>(
    owners: &[ParticipantId],
    counterparts: &[ParticipantId],
    rng: &mut R,
) -> Result<PreferenceTable, InvalidInput> {
    let mut table = PreferenceTable::new();
    for owner in owners {
        let mut ranking = counterparts.to_vec();
        ranking.shuffle(rng);
        table.insert(PreferenceList {
            owner: owner.clone(),
            ranking,
        })?;
    }
    Ok(table)
}
