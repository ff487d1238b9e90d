//! Sorted set: unique members, each with an `f64` score.
//!
//! Members are ordered by (score, member) with ties broken by ascending
//! byte order of the member name. The reverse order is the exact mirror,
//! so ties there come out by descending member name.
//!
//! A sorted `Vec` serves rank and range queries by binary search and a
//! `HashMap` serves member→score lookups.

use crate::error::KvError;
use bytes::Bytes;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::normalize_range;

/// A sorted set of unique members with float scores
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(into = "ScoredPairs", from = "ScoredPairs")]
pub struct SortedSet {
    /// Kept sorted by `(score, member)` at all times.
    sorted: Vec<(OrderedFloat<f64>, Bytes)>,
    scores: HashMap<Bytes, OrderedFloat<f64>>,
}

/// Persisted form. Scores travel as raw bits so infinities survive JSON.
#[derive(Serialize, Deserialize)]
struct ScoredPairs(Vec<(Bytes, u64)>);

impl From<SortedSet> for ScoredPairs {
    fn from(set: SortedSet) -> Self {
        ScoredPairs(
            set.sorted
                .into_iter()
                .map(|(score, member)| (member, score.0.to_bits()))
                .collect(),
        )
    }
}

impl From<ScoredPairs> for SortedSet {
    fn from(pairs: ScoredPairs) -> Self {
        let mut set = SortedSet::new();
        for (member, bits) in pairs.0 {
            set.add(member, f64::from_bits(bits));
        }
        set
    }
}

impl SortedSet {
    /// Creates an empty sorted set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a member or overwrites its score. Returns `true` only when the
    /// member is new.
    pub fn add(&mut self, member: Bytes, score: f64) -> bool {
        let new_score = OrderedFloat(score);

        match self.scores.get(&member).copied() {
            Some(old_score) => {
                if old_score != new_score {
                    let old_idx = self.position(old_score, &member);
                    self.sorted.remove(old_idx);
                    let idx = self.insertion_point(new_score, &member);
                    self.sorted.insert(idx, (new_score, member.clone()));
                    self.scores.insert(member, new_score);
                }
                false
            }
            None => {
                let idx = self.insertion_point(new_score, &member);
                self.sorted.insert(idx, (new_score, member.clone()));
                self.scores.insert(member, new_score);
                true
            }
        }
    }

    /// Removes a member. Returns `true` if it existed.
    pub fn remove(&mut self, member: &[u8]) -> bool {
        match self.scores.remove(member) {
            Some(score) => {
                let idx = self.position(score, member);
                self.sorted.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Adds `delta` to a member's score, creating it at 0 first.
    pub fn incr(&mut self, member: Bytes, delta: f64) -> Result<f64, KvError> {
        let current = self.score(&member).unwrap_or(0.0);
        let next = current + delta;
        if next.is_nan() {
            return Err(KvError::NotFloat);
        }
        self.add(member, next);
        Ok(next)
    }

    /// Returns the score for a member, or `None` if not present.
    pub fn score(&self, member: &[u8]) -> Option<f64> {
        self.scores.get(member).map(|s| s.0)
    }

    /// 0-based position in ascending order.
    pub fn rank(&self, member: &[u8]) -> Option<usize> {
        let score = *self.scores.get(member)?;
        Some(self.position(score, member))
    }

    /// 0-based position in descending order (0 = highest score).
    pub fn rev_rank(&self, member: &[u8]) -> Option<usize> {
        self.rank(member).map(|r| self.sorted.len() - 1 - r)
    }

    /// Members in the given ascending rank window, inclusive on both ends.
    /// Supports negative indices: -1 = last, -2 = second to last, etc.
    pub fn range_by_rank(&self, start: i64, stop: i64) -> Vec<(Bytes, f64)> {
        match normalize_range(start, stop, self.sorted.len()) {
            Some((s, e)) => self.sorted[s..=e]
                .iter()
                .map(|(score, member)| (member.clone(), score.0))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Same as `range_by_rank` but indices address the descending order.
    pub fn rev_range_by_rank(&self, start: i64, stop: i64) -> Vec<(Bytes, f64)> {
        let len = self.sorted.len();
        match normalize_range(start, stop, len) {
            Some((s, e)) => (s..=e)
                .map(|i| {
                    let (score, member) = &self.sorted[len - 1 - i];
                    (member.clone(), score.0)
                })
                .collect(),
            None => Vec::new(),
        }
    }

    /// Members with `min <= score <= max`, ascending.
    pub fn range_by_score(&self, min: f64, max: f64) -> Vec<(Bytes, f64)> {
        let (lo, hi) = self.score_bounds(min, max);
        self.sorted[lo..hi]
            .iter()
            .map(|(score, member)| (member.clone(), score.0))
            .collect()
    }

    /// Number of members with `min <= score <= max`.
    pub fn count_in_range(&self, min: f64, max: f64) -> usize {
        let (lo, hi) = self.score_bounds(min, max);
        hi - lo
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Returns `true` if the sorted set has no members.
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Returns an iterator over (member, score) pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&Bytes, f64)> {
        self.sorted.iter().map(|(score, member)| (member, score.0))
    }

    fn score_bounds(&self, min: f64, max: f64) -> (usize, usize) {
        if min > max || min.is_nan() || max.is_nan() {
            return (0, 0);
        }
        let lo = self.sorted.partition_point(|(s, _)| s.0 < min);
        let hi = self.sorted.partition_point(|(s, _)| s.0 <= max);
        (lo, hi.max(lo))
    }

    fn search(&self, score: OrderedFloat<f64>, member: &[u8]) -> Result<usize, usize> {
        self.sorted
            .binary_search_by(|(s, m)| s.cmp(&score).then_with(|| m.as_ref().cmp(member)))
    }

    /// Index of a member known to be present.
    fn position(&self, score: OrderedFloat<f64>, member: &[u8]) -> usize {
        // scores and sorted are updated together, so the pair is always found
        self.search(score, member).unwrap_or_else(|idx| idx)
    }

    fn insertion_point(&self, score: OrderedFloat<f64>, member: &[u8]) -> usize {
        self.search(score, member).unwrap_or_else(|idx| idx)
    }
}
