//! Set algebra

use crate::store::Scalar;
use std::collections::HashSet;

/// Members present in every set. An empty input list gives an empty result.
pub fn intersect(sets: &[&HashSet<Scalar>]) -> HashSet<Scalar> {
    let Some((smallest, _)) = sets.iter().enumerate().min_by_key(|(_, s)| s.len()) else {
        return HashSet::new();
    };

    sets[smallest]
        .iter()
        .filter(|m| sets.iter().all(|s| s.contains(*m)))
        .cloned()
        .collect()
}

/// Deduplicated union
pub fn union(sets: &[&HashSet<Scalar>]) -> HashSet<Scalar> {
    sets.iter().flat_map(|s| s.iter().cloned()).collect()
}

/// Members of `first` absent from every set in `rest`
pub fn difference(first: &HashSet<Scalar>, rest: &[&HashSet<Scalar>]) -> HashSet<Scalar> {
    first
        .iter()
        .filter(|m| !rest.iter().any(|s| s.contains(*m)))
        .cloned()
        .collect()
}

/// Members sorted by byte order, for deterministic replies
pub fn sorted(set: HashSet<Scalar>) -> Vec<Scalar> {
    let mut members: Vec<Scalar> = set.into_iter().collect();
    members.sort();
    members
}
