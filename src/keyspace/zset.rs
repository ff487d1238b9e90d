//! Sorted set commands

use super::Keyspace;
use crate::error::{KvError, Result};
use crate::store::{KeyType, Value};
use crate::types::sorted_set::SortedSet;
use bytes::Bytes;

/// A member and, when requested, its score
pub type ScoredMember = (Bytes, Option<f64>);

impl Keyspace {
    /// Add members or update their scores, returns how many were new
    ///
    /// A NaN score rejects the whole call before anything is written.
    pub fn zadd<M: AsRef<[u8]>>(&self, key: &[u8], pairs: impl IntoIterator<Item = (f64, M)>) -> Result<usize> {
        let pairs: Vec<(f64, Bytes)> = pairs
            .into_iter()
            .map(|(score, member)| (score, Bytes::copy_from_slice(member.as_ref())))
            .collect();
        if pairs.is_empty() {
            return Err(KvError::wrong_arity("zadd"));
        }
        if pairs.iter().any(|(score, _)| score.is_nan()) {
            return Err(KvError::NotFloat);
        }

        let added = self.update_as(key, KeyType::SortedSet, true, Value::as_sorted_set_mut, |z| {
            let added = pairs
                .into_iter()
                .filter(|(score, member)| z.add(member.clone(), *score))
                .count();
            Ok((added, true))
        })?;
        Ok(added.unwrap_or(0))
    }

    /// Remove members, returns how many were present
    pub fn zrem<M: AsRef<[u8]>>(&self, key: &[u8], members: impl IntoIterator<Item = M>) -> Result<usize> {
        let members: Vec<M> = members.into_iter().collect();
        let removed = self.update_as(key, KeyType::SortedSet, false, Value::as_sorted_set_mut, |z| {
            let removed = members.iter().filter(|m| z.remove(m.as_ref())).count();
            Ok((removed, removed > 0))
        })?;
        Ok(removed.unwrap_or(0))
    }

    /// Members in an ascending rank window
    pub fn zrange(&self, key: &[u8], start: i64, stop: i64, with_scores: bool) -> Result<Vec<ScoredMember>> {
        self.zread_members(key, with_scores, |z| z.range_by_rank(start, stop))
    }

    /// Members in a descending rank window
    pub fn zrevrange(&self, key: &[u8], start: i64, stop: i64, with_scores: bool) -> Result<Vec<ScoredMember>> {
        self.zread_members(key, with_scores, |z| z.rev_range_by_rank(start, stop))
    }

    /// Members with `min <= score <= max`, ascending
    pub fn zrangebyscore(&self, key: &[u8], min: f64, max: f64, with_scores: bool) -> Result<Vec<ScoredMember>> {
        self.zread_members(key, with_scores, |z| z.range_by_score(min, max))
    }

    /// Score of a member
    pub fn zscore(&self, key: &[u8], member: impl AsRef<[u8]>) -> Result<Option<f64>> {
        let member = member.as_ref();
        Ok(self
            .read_as(key, KeyType::SortedSet, Value::as_sorted_set, |z| z.score(member))?
            .flatten())
    }

    /// Number of members, 0 when absent
    pub fn zcard(&self, key: &[u8]) -> Result<usize> {
        Ok(self
            .read_as(key, KeyType::SortedSet, Value::as_sorted_set, |z| z.len())?
            .unwrap_or(0))
    }

    /// 0-based ascending rank of a member
    pub fn zrank(&self, key: &[u8], member: impl AsRef<[u8]>) -> Result<Option<usize>> {
        let member = member.as_ref();
        Ok(self
            .read_as(key, KeyType::SortedSet, Value::as_sorted_set, |z| z.rank(member))?
            .flatten())
    }

    /// 0-based descending rank of a member
    pub fn zrevrank(&self, key: &[u8], member: impl AsRef<[u8]>) -> Result<Option<usize>> {
        let member = member.as_ref();
        Ok(self
            .read_as(key, KeyType::SortedSet, Value::as_sorted_set, |z| z.rev_rank(member))?
            .flatten())
    }

    /// Add `delta` to a member's score, creating it at 0 first
    pub fn zincrby(&self, key: &[u8], delta: f64, member: impl AsRef<[u8]>) -> Result<f64> {
        if delta.is_nan() {
            return Err(KvError::NotFloat);
        }
        let member = Bytes::copy_from_slice(member.as_ref());
        let score = self.update_as(key, KeyType::SortedSet, true, Value::as_sorted_set_mut, |z| {
            z.incr(member, delta).map(|score| (score, true))
        })?;
        score.ok_or(KvError::NoSuchKey)
    }

    /// Number of members with `min <= score <= max`
    pub fn zcount(&self, key: &[u8], min: f64, max: f64) -> Result<usize> {
        Ok(self
            .read_as(key, KeyType::SortedSet, Value::as_sorted_set, |z| z.count_in_range(min, max))?
            .unwrap_or(0))
    }

    fn zread_members(
        &self,
        key: &[u8],
        with_scores: bool,
        query: impl FnOnce(&SortedSet) -> Vec<(Bytes, f64)>,
    ) -> Result<Vec<ScoredMember>> {
        let pairs = self
            .read_as(key, KeyType::SortedSet, Value::as_sorted_set, query)?
            .unwrap_or_default();
        Ok(pairs
            .into_iter()
            .map(|(member, score)| (member, with_scores.then_some(score)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyspace::tests::keyspace;

    fn members(items: Vec<ScoredMember>) -> Vec<String> {
        items
            .into_iter()
            .map(|(m, _)| String::from_utf8(m.to_vec()).unwrap())
            .collect()
    }

    fn leaderboard() -> Keyspace {
        let (ks, _) = keyspace();
        ks.zadd(b"z", [(100.0, "alice"), (200.0, "bob"), (150.0, "carol")])
            .unwrap();
        ks
    }

    #[test]
    fn test_zadd_updates() {
        let ks = leaderboard();
        assert_eq!(ks.zadd(b"z", [(50.0, "alice"), (10.0, "dave")]).unwrap(), 1);
        assert_eq!(ks.zscore(b"z", "alice").unwrap(), Some(50.0));
        assert_eq!(ks.zcard(b"z").unwrap(), 4);
        assert_eq!(ks.zscore(b"z", "nobody").unwrap(), None);
    }

    #[test]
    fn test_zadd_rejects_nan_atomically() {
        let ks = leaderboard();
        assert!(matches!(ks.zadd(b"z", [(1.0, "new"), (f64::NAN, "bad")]), Err(KvError::NotFloat)));
        assert_eq!(ks.zcard(b"z").unwrap(), 3);
    }

    #[test]
    fn test_ranges() {
        let ks = leaderboard();
        assert_eq!(members(ks.zrange(b"z", 0, -1, false).unwrap()), vec!["alice", "carol", "bob"]);
        assert_eq!(members(ks.zrevrange(b"z", 0, 1, false).unwrap()), vec!["bob", "carol"]);

        let scored = ks.zrange(b"z", 0, 0, true).unwrap();
        assert_eq!(scored, vec![(Bytes::from("alice"), Some(100.0))]);
        let bare = ks.zrange(b"z", 0, 0, false).unwrap();
        assert_eq!(bare, vec![(Bytes::from("alice"), None)]);

        assert!(ks.zrange(b"missing", 0, -1, false).unwrap().is_empty());
    }

    #[test]
    fn test_ties_break_by_member() {
        let (ks, _) = keyspace();
        ks.zadd(b"z", [(1.0, "zebra"), (1.0, "apple"), (1.0, "middle")]).unwrap();

        assert_eq!(members(ks.zrange(b"z", 0, -1, false).unwrap()), vec!["apple", "middle", "zebra"]);
        assert_eq!(members(ks.zrevrange(b"z", 0, -1, false).unwrap()), vec!["zebra", "middle", "apple"]);
    }

    #[test]
    fn test_ranks() {
        let ks = leaderboard();
        assert_eq!(ks.zrank(b"z", "alice").unwrap(), Some(0));
        assert_eq!(ks.zrevrank(b"z", "alice").unwrap(), Some(2));
        assert_eq!(ks.zrank(b"z", "nobody").unwrap(), None);
        assert_eq!(ks.zrank(b"missing", "alice").unwrap(), None);
    }

    #[test]
    fn test_score_ranges() {
        let ks = leaderboard();
        assert_eq!(members(ks.zrangebyscore(b"z", 100.0, 150.0, false).unwrap()), vec!["alice", "carol"]);
        assert_eq!(ks.zcount(b"z", f64::NEG_INFINITY, f64::INFINITY).unwrap(), 3);
        assert_eq!(ks.zcount(b"z", 300.0, 100.0).unwrap(), 0);
        assert_eq!(ks.zcount(b"missing", 0.0, 1.0).unwrap(), 0);
    }

    #[test]
    fn test_zincrby() {
        let ks = leaderboard();
        assert_eq!(ks.zincrby(b"z", 100.0, "alice").unwrap(), 200.0);
        assert_eq!(ks.zincrby(b"z", 5.0, "erin").unwrap(), 5.0);
        assert_eq!(members(ks.zrange(b"z", 0, 0, false).unwrap()), vec!["erin"]);
        assert!(matches!(ks.zincrby(b"z", f64::NAN, "alice"), Err(KvError::NotFloat)));
    }

    #[test]
    fn test_zrem_deletes_empty_key() {
        let ks = leaderboard();
        assert_eq!(ks.zrem(b"z", ["alice", "nobody"]).unwrap(), 1);
        assert_eq!(ks.zrem(b"z", ["bob", "carol"]).unwrap(), 2);
        assert_eq!(ks.exists([b"z"]).unwrap(), 0);
    }
}
